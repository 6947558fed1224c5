//! Shared fixtures

use sitenav::access::SessionSubject;
use sitenav::concurrency::SitemapPublisher;
use sitenav::i18n::{MapTranslator, UnicodeCollator};
use sitenav::navigation::{HeadlessViews, Navigator};
use sitenav::sitemap::{DirectSource, SitemapBuildService, SitemapDeclaration};
use sitenav::tree::{AccessPolicy, NodeRecord, StandardPageKey};
use sitenav::types::Locale;
use sitenav::user::UserSitemap;
use std::sync::Arc;

pub fn page(uri: &str, policy: AccessPolicy) -> NodeRecord {
    NodeRecord::new(uri, uri.replace('/', "."), policy).with_view("page")
}

/// Public home, login and logout pages, a private home, a permission-guarded
/// `private/page1` reached through the `private` redirect, a `private/settings`
/// page that needs a full login, and a hidden page.
pub fn standard_declaration() -> SitemapDeclaration {
    SitemapDeclaration::new("core")
        .page(page("public/home", AccessPolicy::Public).with_standard_page(StandardPageKey::PublicHome))
        .page(page("public/login", AccessPolicy::Guest).with_standard_page(StandardPageKey::Login))
        .page(page("public/logout", AccessPolicy::Public).with_standard_page(StandardPageKey::Logout))
        .page(page("public/about", AccessPolicy::Public).with_position(2))
        .page(page("public/hidden", AccessPolicy::Public).with_position(-1))
        .page(page("private/home", AccessPolicy::User).with_standard_page(StandardPageKey::PrivateHome))
        .page(page("private/page1", AccessPolicy::Permission))
        .page(page("private/admin", AccessPolicy::roles(["admin"])))
        .page(page("private/settings", AccessPolicy::Authentication))
        .redirect("private", "private/page1")
}

pub fn build_service(declaration: SitemapDeclaration) -> SitemapBuildService {
    SitemapBuildService::new(vec![DirectSource::NAME.to_string()])
        .register(Arc::new(DirectSource::new().with_module(declaration)))
}

pub fn publisher(declaration: SitemapDeclaration) -> Arc<SitemapPublisher> {
    let publisher = Arc::new(SitemapPublisher::new());
    publisher.build(&build_service(declaration)).unwrap();
    publisher
}

pub struct Session {
    pub subject: Arc<SessionSubject>,
    pub sitemap: Arc<UserSitemap>,
    pub views: Arc<HeadlessViews>,
    pub navigator: Navigator,
}

pub fn session(publisher: Arc<SitemapPublisher>, translator: MapTranslator) -> Session {
    let subject = Arc::new(SessionSubject::new());
    let sitemap = Arc::new(UserSitemap::new(
        publisher,
        subject.clone(),
        Arc::new(translator),
        Arc::new(UnicodeCollator),
        Locale::default(),
    ));
    let views = Arc::new(HeadlessViews::new());
    let navigator = Navigator::new(sitemap.clone(), views.clone(), views.clone());
    Session {
        subject,
        sitemap,
        views,
        navigator,
    }
}
