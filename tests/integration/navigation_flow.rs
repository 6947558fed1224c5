use crate::integration::support::{publisher, session, standard_declaration};
use parking_lot::Mutex;
use sitenav::error::{AccessError, NavigationError};
use sitenav::i18n::MapTranslator;
use sitenav::navigation::{
    AfterNavigationListener, BeforeNavigationListener, NavigationEvent, NavigationOutcome,
    NavigationState, SubjectChange, SubjectChangeListener, Verdict,
};
use sitenav::tree::StandardPageKey;
use sitenav::types::Locale;
use std::sync::Arc;

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl BeforeNavigationListener for EventLog {
    fn before_navigation(&self, event: &NavigationEvent) -> Verdict {
        self.0.lock().push(format!("before {}", event.to));
        Verdict::Proceed
    }
}

impl AfterNavigationListener for EventLog {
    fn after_navigation(&self, event: &NavigationEvent) {
        let from = event.from.as_ref().map(|s| s.to_string()).unwrap_or_default();
        self.0.lock().push(format!("after {} -> {}", from, event.to));
    }
}

impl SubjectChangeListener for EventLog {
    fn subject_changed(&self, change: SubjectChange) {
        self.0.lock().push(format!("{change:?}"));
    }
}

#[test]
fn login_redirect_round_trip() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    s.navigator.navigate_to("public/home").unwrap();

    let outcome = s.navigator.navigate_to("private").unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::LoginRequired {
            requested: NavigationState::from_uri("private")
        }
    );
    assert_eq!(s.navigator.current_node().unwrap().uri(), "public/login");
    assert_eq!(s.navigator.previous_state().unwrap().to_string(), "private");

    s.subject.login();
    s.subject.grant_permission("page:view:private:page1");
    s.navigator.login_succeeded().unwrap();
    assert_eq!(s.navigator.current_node().unwrap().uri(), "private/page1");
    assert_eq!(s.navigator.previous_state().unwrap().virtual_page(), "public/login");
}

#[test]
fn remembered_subject_must_log_in_for_authentication_pages() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    s.subject.set_remembered(true);
    s.navigator.navigate_to("private/home").unwrap();
    assert_eq!(s.navigator.current_node().unwrap().uri(), "private/home");

    let outcome = s.navigator.navigate_to("private/settings").unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::LoginRequired {
            requested: NavigationState::from_uri("private/settings")
        }
    );
    assert_eq!(s.navigator.current_node().unwrap().uri(), "public/login");
    assert_eq!(s.navigator.previous_state().unwrap().to_string(), "private/settings");
    assert!(s.navigator.previous_node().is_none());
    assert_eq!(
        s.views.shown().last().map(|(_, state)| state.clone()),
        Some("public/login".to_string())
    );

    s.subject.login();
    let outcome = s.navigator.login_succeeded().unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::Navigated {
            to: NavigationState::from_uri("private/settings")
        }
    );
    assert_eq!(s.navigator.current_node().unwrap().uri(), "private/settings");
}

#[test]
fn login_after_logout_goes_home() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    s.navigator.navigate_to("public/logout").unwrap();
    s.navigator.navigate_to_standard(StandardPageKey::Login).unwrap();
    assert_eq!(s.navigator.previous_state().unwrap().virtual_page(), "public/logout");

    s.subject.login();
    s.navigator.login_succeeded().unwrap();
    assert_eq!(s.navigator.current_state().unwrap().virtual_page(), "private/home");
}

#[test]
fn repeated_navigation_fires_one_set_of_events() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    let log = Arc::new(EventLog::default());
    s.navigator.add_before_listener(log.clone());
    s.navigator.add_after_listener(log.clone());

    s.navigator.navigate_to("public/about").unwrap();
    s.navigator.navigate_to("public/about").unwrap();
    s.navigator
        .navigate_to(NavigationState::from_uri("public/about"))
        .unwrap();

    assert_eq!(
        *log.0.lock(),
        vec!["before public/about", "after  -> public/about"]
    );
    assert_eq!(s.views.shown().len(), 1);
}

#[test]
fn parameters_make_a_different_state() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    s.navigator.navigate_to("public/about").unwrap();
    let outcome = s.navigator.navigate_to("public/about/tab=team").unwrap();
    assert!(matches!(outcome, NavigationOutcome::Navigated { .. }));
    assert_eq!(s.navigator.current_state().unwrap().parameter("tab"), Some("team"));
    assert_eq!(s.navigator.previous_state().unwrap().to_string(), "public/about");
}

#[test]
fn role_denial_propagates_for_logged_in_subject() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    s.subject.login();
    s.navigator.login_succeeded().unwrap();

    let err = s.navigator.navigate_to("private/admin").unwrap_err();
    assert_eq!(
        err,
        NavigationError::Access(AccessError::Unauthorized {
            uri: "private/admin".to_string()
        })
    );
    assert_eq!(s.navigator.current_state().unwrap().virtual_page(), "private/home");

    s.subject.grant_role("admin");
    s.sitemap.structure_changed();
    assert!(matches!(
        s.navigator.navigate_to("private/admin").unwrap(),
        NavigationOutcome::Navigated { .. }
    ));
}

#[test]
fn guest_page_denied_once_logged_in() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    s.subject.login();
    s.navigator.login_succeeded().unwrap();
    assert!(matches!(
        s.navigator.navigate_to("public/login").unwrap_err(),
        NavigationError::Access(AccessError::Unauthorized { .. })
    ));
}

#[test]
fn hidden_page_is_not_found_rather_than_denied() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    assert_eq!(
        s.navigator.navigate_to("public/hidden").unwrap(),
        NavigationOutcome::InvalidUri("public/hidden".to_string())
    );
}

#[test]
fn logout_notifies_listeners_and_returns_home() {
    let mut s = session(publisher(standard_declaration()), MapTranslator::new());
    let log = Arc::new(EventLog::default());
    s.navigator.add_subject_listener(log.clone());

    s.subject.login();
    s.navigator.login_succeeded().unwrap();
    s.subject.logout();
    s.navigator.logged_out().unwrap();

    assert_eq!(*log.0.lock(), vec!["LoggedIn", "LoggedOut"]);
    assert_eq!(s.navigator.current_state().unwrap().virtual_page(), "public/home");
    assert!(s.sitemap.node_for_uri("private/home").unwrap().is_none());
}

#[test]
fn locale_change_relabels_current_node_and_route() {
    let translator = MapTranslator::new()
        .with("de", "public", "Öffentlich")
        .with("de", "public.about", "Über uns");
    let mut s = session(publisher(standard_declaration()), translator);
    s.navigator.navigate_to("public/about").unwrap();
    assert_eq!(s.navigator.current_node().unwrap().label(), "Public about");

    s.navigator.locale_changed(Locale::new("de-AT")).unwrap();
    assert_eq!(s.navigator.current_node().unwrap().label(), "Über uns");
    let route: Vec<String> = s
        .navigator
        .route()
        .unwrap()
        .iter()
        .map(|n| n.label().to_string())
        .collect();
    assert_eq!(route, vec!["Öffentlich", "Über uns"]);
}
