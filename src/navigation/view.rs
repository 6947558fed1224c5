//! Collaborators that render pages and report bad URIs

use crate::error::{NavigationError, NavigationResult};
use crate::navigation::NavigationState;
use crate::types::ViewType;
use crate::user::UserNode;
use parking_lot::Mutex;
use std::any::Any;
use tracing::warn;

/// An instantiated view; the payload belongs to the view layer
pub struct ViewHandle {
    pub view_type: ViewType,
    payload: Box<dyn Any + Send>,
}

impl ViewHandle {
    pub fn new(view_type: ViewType, payload: Box<dyn Any + Send>) -> Self {
        Self { view_type, payload }
    }

    pub fn payload<T: 'static>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHandle")
            .field("view_type", &self.view_type)
            .finish_non_exhaustive()
    }
}

/// Creates views from their type reference
pub trait ViewFactory: Send + Sync {
    fn instantiate(&self, view_type: &ViewType) -> NavigationResult<ViewHandle>;
}

/// Host environment that displays the current view
pub trait ViewHost: Send + Sync {
    fn show(&self, view: ViewHandle, node: &UserNode, state: &NavigationState);
}

/// User-visible notification for fragments that match no page
pub trait InvalidUriHandler: Send + Sync {
    fn invalid_uri(&self, state: &NavigationState);
}

/// Reports invalid URIs to the log only
#[derive(Debug, Default)]
pub struct LoggingInvalidUriHandler;

impl InvalidUriHandler for LoggingInvalidUriHandler {
    fn invalid_uri(&self, state: &NavigationState) {
        warn!(fragment = %state, "Navigation target does not exist");
    }
}

/// View factory and host with nothing to render; remembers what it was asked to show
#[derive(Debug, Default)]
pub struct HeadlessViews {
    shown: Mutex<Vec<(ViewType, String)>>,
}

impl HeadlessViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// (view type, fragment) pairs in display order
    pub fn shown(&self) -> Vec<(ViewType, String)> {
        self.shown.lock().clone()
    }
}

impl ViewFactory for HeadlessViews {
    fn instantiate(&self, view_type: &ViewType) -> NavigationResult<ViewHandle> {
        if view_type.as_str().is_empty() {
            return Err(NavigationError::View("empty view type".to_string()));
        }
        Ok(ViewHandle::new(view_type.clone(), Box::new(())))
    }
}

impl ViewHost for HeadlessViews {
    fn show(&self, view: ViewHandle, _node: &UserNode, state: &NavigationState) {
        self.shown.lock().push((view.view_type, state.to_string()));
    }
}
