//! Navigation lifecycle notifications
//!
//! Two explicit phases: every before-listener may veto a navigation, and
//! after-listeners run only for navigations that were committed.

use crate::navigation::NavigationState;
use std::sync::Arc;
use tracing::debug;

/// Navigation from one state to another; `from` is None for the first navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub from: Option<NavigationState>,
    pub to: NavigationState,
}

/// Answer of a before-navigation listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    Cancel,
}

pub trait BeforeNavigationListener: Send + Sync {
    fn before_navigation(&self, event: &NavigationEvent) -> Verdict;
}

pub trait AfterNavigationListener: Send + Sync {
    fn after_navigation(&self, event: &NavigationEvent);
}

/// Authentication state transition of the session's subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectChange {
    LoggedIn,
    LoggedOut,
}

pub trait SubjectChangeListener: Send + Sync {
    fn subject_changed(&self, change: SubjectChange);
}

/// Subscribers, notified in subscription order
#[derive(Default, Clone)]
pub struct NavigationListeners {
    before: Vec<Arc<dyn BeforeNavigationListener>>,
    after: Vec<Arc<dyn AfterNavigationListener>>,
}

impl NavigationListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_before(&mut self, listener: Arc<dyn BeforeNavigationListener>) {
        self.before.push(listener);
    }

    pub fn add_after(&mut self, listener: Arc<dyn AfterNavigationListener>) {
        self.after.push(listener);
    }

    /// Returns true when a listener cancelled; later listeners are not asked
    pub fn notify_before(&self, event: &NavigationEvent) -> bool {
        for (index, listener) in self.before.iter().enumerate() {
            if listener.before_navigation(event) == Verdict::Cancel {
                debug!(listener = index, to = %event.to, "Navigation vetoed");
                return true;
            }
        }
        false
    }

    pub fn notify_after(&self, event: &NavigationEvent) {
        for listener in &self.after {
            listener.after_navigation(event);
        }
    }
}
