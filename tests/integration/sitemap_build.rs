use crate::integration::support::{build_service, page, publisher, standard_declaration};
use sitenav::concurrency::SitemapPublisher;
use sitenav::error::SitemapError;
use sitenav::sitemap::{
    ConsistencyChecker, DirectSource, FileSource, MasterSitemap, SitemapBuildService,
    SitemapDeclaration,
};
use sitenav::tree::{AccessPolicy, StandardPageKey};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn acyclic_redirects_build_and_lock() {
    let built = build_service(standard_declaration()).build().unwrap();
    assert!(built.sitemap.is_locked());
    assert_eq!(built.sitemap.redirect_target("private").as_deref(), Some("private/page1"));
    assert_eq!(
        built.contributions,
        vec![("direct".to_string(), vec!["direct:core".to_string()])]
    );
}

#[test]
fn cyclic_redirects_fail_and_leave_sitemap_unlocked() {
    let mut sitemap = MasterSitemap::new();
    sitemap.add_node(page("a", AccessPolicy::Public)).unwrap();
    sitemap.add_node(page("b", AccessPolicy::Public)).unwrap();
    sitemap.add_redirect("a", "b").unwrap();
    sitemap.add_redirect("b", "a").unwrap();

    let err = ConsistencyChecker::new().check(&mut sitemap).unwrap_err();
    match err {
        SitemapError::Inconsistent { loops, .. } => assert_eq!(loops.len(), 1),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!sitemap.is_locked());
}

#[test]
fn failed_build_publishes_nothing() {
    let declaration = SitemapDeclaration::new("loop")
        .page(page("a", AccessPolicy::Public))
        .page(page("b", AccessPolicy::Public))
        .redirect("a", "b")
        .redirect("b", "a");
    let publisher = SitemapPublisher::new();
    assert!(matches!(
        publisher.build(&build_service(declaration)),
        Err(SitemapError::Inconsistent { .. })
    ));
    assert_eq!(publisher.current().unwrap_err(), SitemapError::NotBuilt);
    assert_eq!(publisher.generation(), 0);
}

#[test]
fn rebuild_replaces_published_sitemap() {
    let publisher = publisher(standard_declaration());
    let first = publisher.current().unwrap();

    let bigger = standard_declaration().page(page("public/contact", AccessPolicy::Public));
    publisher.build(&build_service(bigger)).unwrap();
    let second = publisher.current().unwrap();

    assert!(!first.has_uri("public/contact"));
    assert!(second.has_uri("public/contact"));
    assert_eq!(publisher.generation(), 2);
}

#[test]
fn locked_sitemap_rejects_mutation() {
    let mut sitemap = build_service(standard_declaration()).build().unwrap().sitemap;
    assert_eq!(
        sitemap.add_node(page("late", AccessPolicy::Public)).unwrap_err(),
        SitemapError::Locked
    );
    assert_eq!(sitemap.add_redirect("x", "y").unwrap_err(), SitemapError::Locked);
}

#[test]
fn unknown_source_names_fail_fast() {
    let service = SitemapBuildService::new(vec!["ldap".to_string()])
        .register(Arc::new(DirectSource::new()));
    assert_eq!(service.build().unwrap_err(), SitemapError::NoValidSource);
}

#[test]
fn file_and_direct_sources_combine_in_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("extra.yaml");
    fs::write(
        &path,
        r#"
name: extra
pages:
  - uri: public/help
    label: help
    policy: public
    view: help
  - uri: staff/reports
    label: reports
    policy:
      roles: [staff]
    view: reports
redirects:
  - from: help
    to: public/help
"#,
    )
    .unwrap();

    let service = SitemapBuildService::new(vec!["direct".to_string(), "file".to_string()])
        .register(Arc::new(
            DirectSource::new().with_module(
                SitemapDeclaration::new("core").page(
                    page("public/home", AccessPolicy::Public)
                        .with_standard_page(StandardPageKey::PublicHome),
                ),
            ),
        ))
        .register(Arc::new(FileSource::new(vec![path.clone()])));
    let built = service.build().unwrap();

    assert!(built.sitemap.has_uri("public/help"));
    assert_eq!(
        built.sitemap.node_for_uri("staff/reports").unwrap().required_roles().len(),
        1
    );
    assert_eq!(built.sitemap.sources()[0], "direct:core");
    assert_eq!(built.contributions[1].0, "file");
    assert_eq!(
        built.sitemap.standard_page_uri(StandardPageKey::PublicHome),
        Some("public/home")
    );
}

#[test]
fn duplicate_declaration_fails_the_build() {
    let declaration = SitemapDeclaration::new("dup")
        .page(page("public/home", AccessPolicy::Public))
        .page(page("public/home", AccessPolicy::Guest));
    assert_eq!(
        build_service(declaration).build().unwrap_err(),
        SitemapError::DuplicateUri("public/home".to_string())
    );
}
