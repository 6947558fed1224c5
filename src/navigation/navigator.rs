//! Per-session navigator
//!
//! Owns the single-slot navigation history of one session and moves it from
//! page to page: redirects are followed, access is re-checked, listeners get a
//! chance to veto, and only then is the view shown and the history committed.

use crate::access::evaluate;
use crate::config::NavigationConfig;
use crate::error::{AccessError, NavigationError, NavigationResult, SitemapResult};
use crate::navigation::events::{
    AfterNavigationListener, BeforeNavigationListener, NavigationEvent, NavigationListeners,
    SubjectChange, SubjectChangeListener,
};
use crate::navigation::rules::{
    DefaultLoginNavigationRule, DefaultLogoutNavigationRule, LoginNavigationRule,
    LogoutNavigationRule,
};
use crate::navigation::state::{FragmentParser, NavigationState, StrictFragmentParser};
use crate::navigation::view::{InvalidUriHandler, LoggingInvalidUriHandler, ViewFactory, ViewHost};
use crate::tree::StandardPageKey;
use crate::types::Locale;
use crate::user::{UserNode, UserSitemap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Page config key listing parameters a page cannot be shown without
pub const REQUIRED_PARAMETERS_KEY: &str = "required_parameters";

/// Lifecycle of a navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorPhase {
    Uninitialized,
    Ready,
    Navigating,
}

/// Anything that can be navigated to
#[derive(Debug, Clone)]
pub enum NavigationTarget {
    Fragment(String),
    State(NavigationState),
    Node(UserNode),
    Standard(StandardPageKey),
}

impl From<&str> for NavigationTarget {
    fn from(fragment: &str) -> Self {
        NavigationTarget::Fragment(fragment.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(fragment: String) -> Self {
        NavigationTarget::Fragment(fragment)
    }
}

impl From<NavigationState> for NavigationTarget {
    fn from(state: NavigationState) -> Self {
        NavigationTarget::State(state)
    }
}

impl From<&UserNode> for NavigationTarget {
    fn from(node: &UserNode) -> Self {
        NavigationTarget::Node(node.clone())
    }
}

impl From<StandardPageKey> for NavigationTarget {
    fn from(key: StandardPageKey) -> Self {
        NavigationTarget::Standard(key)
    }
}

/// What a navigation request ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The view was shown and the history committed
    Navigated { to: NavigationState },
    /// Already there; nothing happened
    Unchanged,
    /// A before-navigation listener vetoed
    Cancelled,
    /// No such page; the invalid-URI handler was told
    InvalidUri(String),
    /// The login page is shown; `requested` is remembered as the previous state
    LoginRequired { requested: NavigationState },
}

/// Current and previous location, one level deep
#[derive(Debug, Clone, Default)]
pub struct History {
    pub current_state: Option<NavigationState>,
    pub current_node: Option<UserNode>,
    pub previous_state: Option<NavigationState>,
    pub previous_node: Option<UserNode>,
}

impl History {
    pub fn current_state(&self) -> Option<&NavigationState> {
        self.current_state.as_ref()
    }

    pub fn current_node(&self) -> Option<&UserNode> {
        self.current_node.as_ref()
    }

    pub fn previous_state(&self) -> Option<&NavigationState> {
        self.previous_state.as_ref()
    }

    pub fn previous_node(&self) -> Option<&UserNode> {
        self.previous_node.as_ref()
    }
}

pub struct Navigator {
    sitemap: Arc<UserSitemap>,
    parser: Arc<dyn FragmentParser>,
    views: Arc<dyn ViewFactory>,
    host: Arc<dyn ViewHost>,
    invalid_uri: Arc<dyn InvalidUriHandler>,
    login_rule: Box<dyn LoginNavigationRule>,
    logout_rule: Box<dyn LogoutNavigationRule>,
    listeners: NavigationListeners,
    subject_listeners: Vec<Arc<dyn SubjectChangeListener>>,
    history: History,
    phase: NavigatorPhase,
}

impl Navigator {
    pub fn new(
        sitemap: Arc<UserSitemap>,
        views: Arc<dyn ViewFactory>,
        host: Arc<dyn ViewHost>,
    ) -> Self {
        Self {
            sitemap,
            parser: Arc::new(StrictFragmentParser::default()),
            views,
            host,
            invalid_uri: Arc::new(LoggingInvalidUriHandler),
            login_rule: Box::new(DefaultLoginNavigationRule::default()),
            logout_rule: Box::new(DefaultLogoutNavigationRule::default()),
            listeners: NavigationListeners::new(),
            subject_listeners: Vec::new(),
            history: History::default(),
            phase: NavigatorPhase::Uninitialized,
        }
    }

    /// Apply the `[navigation]` settings: fragment style and login/logout destinations
    pub fn configured(self, config: &NavigationConfig) -> Self {
        self.with_parser(Arc::new(StrictFragmentParser::new(config.use_bang)))
            .with_login_rule(Box::new(DefaultLoginNavigationRule::new(config.login_home)))
            .with_logout_rule(Box::new(DefaultLogoutNavigationRule::new(
                config.logout_target,
            )))
    }

    pub fn with_parser(mut self, parser: Arc<dyn FragmentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_invalid_uri_handler(mut self, handler: Arc<dyn InvalidUriHandler>) -> Self {
        self.invalid_uri = handler;
        self
    }

    pub fn with_login_rule(mut self, rule: Box<dyn LoginNavigationRule>) -> Self {
        self.login_rule = rule;
        self
    }

    pub fn with_logout_rule(mut self, rule: Box<dyn LogoutNavigationRule>) -> Self {
        self.logout_rule = rule;
        self
    }

    pub fn add_before_listener(&mut self, listener: Arc<dyn BeforeNavigationListener>) {
        self.listeners.add_before(listener);
    }

    pub fn add_after_listener(&mut self, listener: Arc<dyn AfterNavigationListener>) {
        self.listeners.add_after(listener);
    }

    pub fn add_subject_listener(&mut self, listener: Arc<dyn SubjectChangeListener>) {
        self.subject_listeners.push(listener);
    }

    /// Build the user sitemap; requires a published master sitemap
    pub fn init(&mut self) -> SitemapResult<()> {
        self.sitemap.ensure_current()?;
        self.phase = NavigatorPhase::Ready;
        debug!("Navigator ready");
        Ok(())
    }

    pub fn phase(&self) -> NavigatorPhase {
        self.phase
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_state(&self) -> Option<&NavigationState> {
        self.history.current_state()
    }

    pub fn current_node(&self) -> Option<&UserNode> {
        self.history.current_node()
    }

    pub fn previous_state(&self) -> Option<&NavigationState> {
        self.history.previous_state()
    }

    pub fn previous_node(&self) -> Option<&UserNode> {
        self.history.previous_node()
    }

    /// The current location rendered as a fragment
    pub fn current_fragment(&self) -> Option<String> {
        self.history
            .current_state()
            .map(|state| self.parser.render(state))
    }

    pub fn sitemap(&self) -> &Arc<UserSitemap> {
        &self.sitemap
    }

    /// Forget the previous location
    pub fn clear_history(&mut self) {
        self.history.previous_state = None;
        self.history.previous_node = None;
    }

    /// Breadcrumb trail from the outermost visible ancestor to the current page
    pub fn route(&self) -> SitemapResult<Vec<UserNode>> {
        match self.history.current_node() {
            Some(node) => self.sitemap.node_chain_for(node),
            None => Ok(Vec::new()),
        }
    }

    pub fn navigate_to(
        &mut self,
        target: impl Into<NavigationTarget>,
    ) -> NavigationResult<NavigationOutcome> {
        if self.phase == NavigatorPhase::Uninitialized {
            self.init()?;
        }
        let requested = self.target_state(target.into())?;

        self.phase = NavigatorPhase::Navigating;
        let result = self.navigate_state(requested);
        self.phase = NavigatorPhase::Ready;
        result
    }

    pub fn navigate_to_standard(
        &mut self,
        key: StandardPageKey,
    ) -> NavigationResult<NavigationOutcome> {
        self.navigate_to(key)
    }

    /// The subject's authentication state changed; rebuild visibility and apply the login or logout rule
    pub fn subject_changed(&mut self, change: SubjectChange) -> NavigationResult<NavigationOutcome> {
        self.sitemap.structure_changed();
        for listener in &self.subject_listeners {
            listener.subject_changed(change);
        }

        let destination = match change {
            SubjectChange::LoggedIn => self.login_rule.after_login(&self.history, &self.sitemap)?,
            SubjectChange::LoggedOut => {
                self.logout_rule.after_logout(&self.history, &self.sitemap)?
            }
        };
        info!(?change, destination = ?destination.as_ref().map(|s| s.to_string()), "Subject changed");
        match destination {
            Some(state) => self.navigate_to(state),
            None => Ok(NavigationOutcome::Unchanged),
        }
    }

    pub fn login_succeeded(&mut self) -> NavigationResult<NavigationOutcome> {
        self.subject_changed(SubjectChange::LoggedIn)
    }

    pub fn logged_out(&mut self) -> NavigationResult<NavigationOutcome> {
        self.subject_changed(SubjectChange::LoggedOut)
    }

    /// Relabel the session; the current node is re-read from the rebuilt sitemap
    pub fn locale_changed(&mut self, locale: Locale) -> SitemapResult<()> {
        self.sitemap.set_locale(locale);
        if let Some(state) = &self.history.current_state {
            self.history.current_node = self.sitemap.labelled_node(&state.virtual_page())?;
        }
        if let Some(state) = &self.history.previous_state {
            self.history.previous_node = self.sitemap.node_for_uri(&state.virtual_page())?;
        }
        Ok(())
    }

    fn target_state(&self, target: NavigationTarget) -> NavigationResult<NavigationState> {
        match target {
            NavigationTarget::Fragment(fragment) => Ok(self.parser.parse(&fragment)),
            NavigationTarget::State(state) => Ok(state),
            NavigationTarget::Node(node) => Ok(NavigationState::from_uri(node.uri())),
            NavigationTarget::Standard(key) => self
                .sitemap
                .standard_page_uri(key)?
                .map(|uri| NavigationState::from_uri(&uri))
                .ok_or_else(|| NavigationError::UnresolvedUri(format!("{:?}", key))),
        }
    }

    fn navigate_state(&mut self, requested: NavigationState) -> NavigationResult<NavigationOutcome> {
        let requested = if requested.segments().is_empty() {
            match self.sitemap.standard_page_uri(StandardPageKey::PublicHome)? {
                Some(home) => requested.with_virtual_page(&home),
                None => requested,
            }
        } else {
            requested
        };

        let state = match self.sitemap.redirect_target(&requested.virtual_page())? {
            Some(target) => {
                debug!(from = %requested, to = %target, "Following redirect");
                requested.with_virtual_page(&target)
            }
            None => requested.clone(),
        };

        if self.history.current_state.as_ref() == Some(&state) {
            debug!(state = %state, "Already at navigation target");
            return Ok(NavigationOutcome::Unchanged);
        }

        let uri = state.virtual_page();
        let subject = self.sitemap.subject().clone();
        match self.sitemap.node_for_uri(&uri)? {
            Some(node) => {
                // The subject may have changed since the sitemap was built
                if let Err(denial) = evaluate(node.policy(), node.uri(), subject.as_ref()) {
                    return self.handle_denial(denial, requested);
                }
                self.show(node, state)
            }
            None => {
                let master = self.sitemap.master()?;
                if let Some(node) = master.node_for_uri(&uri).filter(|n| !n.is_hidden()) {
                    if let Err(denial) = evaluate(&node.policy, &node.uri, subject.as_ref()) {
                        return self.handle_denial(denial, requested);
                    }
                }
                self.invalid_uri.invalid_uri(&state);
                Ok(NavigationOutcome::InvalidUri(self.parser.render(&state)))
            }
        }
    }

    fn handle_denial(
        &mut self,
        denial: AccessError,
        requested: NavigationState,
    ) -> NavigationResult<NavigationOutcome> {
        if !matches!(denial, AccessError::Unauthenticated { .. }) {
            warn!(uri = denial.uri(), "Navigation denied");
            return Err(denial.into());
        }

        let login_uri = match self.sitemap.standard_page_uri(StandardPageKey::Login)? {
            Some(uri) if uri != requested.virtual_page() => uri,
            _ => return Err(denial.into()),
        };
        let login_state = NavigationState::from_uri(&login_uri);
        info!(requested = %requested, login = %login_uri, "Login required");

        if self.history.current_state.as_ref() != Some(&login_state) {
            let login_node = self
                .sitemap
                .labelled_node(&login_uri)?
                .ok_or_else(|| NavigationError::UnresolvedUri(login_uri.clone()))?;
            match self.show(login_node, login_state)? {
                NavigationOutcome::Navigated { .. } => {}
                other => return Ok(other),
            }
        }

        self.history.previous_state = Some(requested.clone());
        self.history.previous_node = None;
        Ok(NavigationOutcome::LoginRequired { requested })
    }

    fn show(
        &mut self,
        node: UserNode,
        state: NavigationState,
    ) -> NavigationResult<NavigationOutcome> {
        if let Some(required) = node
            .master()
            .config
            .as_ref()
            .and_then(|config| config.get(REQUIRED_PARAMETERS_KEY))
        {
            for key in required.split(',').map(str::trim).filter(|k| !k.is_empty()) {
                state.require_parameter(key)?;
            }
        }

        let view_type = node
            .view()
            .cloned()
            .ok_or_else(|| NavigationError::View(format!("No view declared for {}", node.uri())))?;

        // A view that cannot be created fails the call before any listener hears of it
        let view = self.views.instantiate(&view_type)?;

        let event = NavigationEvent {
            from: self.history.current_state.clone(),
            to: state.clone(),
        };
        if self.listeners.notify_before(&event) {
            info!(to = %state, "Navigation cancelled");
            return Ok(NavigationOutcome::Cancelled);
        }

        self.host.show(view, &node, &state);

        let history = &mut self.history;
        history.previous_state = history.current_state.take();
        history.previous_node = history.current_node.take();
        history.current_state = Some(state.clone());
        history.current_node = Some(node);
        info!(to = %state, "Navigated");

        self.listeners.notify_after(&event);
        Ok(NavigationOutcome::Navigated { to: state })
    }
}
