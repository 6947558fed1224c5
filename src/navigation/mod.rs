//! Navigation
//!
//! Parses fragments into [`NavigationState`]s and drives the per-session
//! [`Navigator`] that resolves them against the user sitemap.

pub mod events;
pub mod navigator;
pub mod rules;
pub mod state;
pub mod view;

pub use events::{
    AfterNavigationListener, BeforeNavigationListener, NavigationEvent, NavigationListeners,
    SubjectChange, SubjectChangeListener, Verdict,
};
pub use navigator::{History, NavigationOutcome, NavigationTarget, Navigator, NavigatorPhase};
pub use rules::{
    DefaultLoginNavigationRule, DefaultLogoutNavigationRule, LoginNavigationRule,
    LogoutNavigationRule,
};
pub use state::{FragmentParser, NavigationState, StrictFragmentParser};
pub use view::{
    HeadlessViews, InvalidUriHandler, LoggingInvalidUriHandler, ViewFactory, ViewHandle, ViewHost,
};
