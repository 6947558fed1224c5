use crate::integration::support::{build_service, page, publisher, session, standard_declaration};
use proptest::prelude::*;
use sitenav::access::SessionSubject;
use sitenav::concurrency::SitemapPublisher;
use sitenav::i18n::{MapTranslator, UnicodeCollator};
use sitenav::sitemap::SitemapDeclaration;
use sitenav::sort::{SortMode, SortType};
use sitenav::tree::{AccessPolicy, NodeRecord};
use sitenav::types::Locale;
use sitenav::user::UserSitemap;
use std::sync::Arc;
use std::thread;

fn policy(choice: u8) -> AccessPolicy {
    match choice % 5 {
        0 => AccessPolicy::Public,
        1 => AccessPolicy::Guest,
        2 => AccessPolicy::Authentication,
        3 => AccessPolicy::User,
        _ => AccessPolicy::roles(["staff"]),
    }
}

/// Three-level tree a, a/b, a/b/c, ... with the given positions and policies
fn declaration(levels: &[(i32, u8)]) -> SitemapDeclaration {
    let mut declaration = SitemapDeclaration::new("generated");
    for (branch, chunk) in levels.chunks(3).enumerate() {
        let mut uri = format!("n{branch}");
        for (depth, (position, choice)) in chunk.iter().enumerate() {
            if depth > 0 {
                uri = format!("{uri}/n{branch}_{depth}");
            }
            declaration = declaration.page(
                NodeRecord::new(uri.clone(), uri.clone(), policy(*choice))
                    .with_view("page")
                    .with_position(*position),
            );
        }
    }
    declaration
}

proptest! {
    #[test]
    fn hidden_nodes_never_appear(
        levels in proptest::collection::vec((-2i32..3, any::<u8>()), 1..12),
        authenticated in any::<bool>(),
        remembered in any::<bool>(),
        staff in any::<bool>(),
    ) {
        let publisher = publisher(declaration(&levels));
        let subject = Arc::new(SessionSubject::new());
        if authenticated {
            subject.login();
        }
        subject.set_remembered(remembered);
        if staff {
            subject.grant_role("staff");
        }
        let sitemap = UserSitemap::new(
            publisher.clone(),
            subject,
            Arc::new(MapTranslator::new()),
            Arc::new(UnicodeCollator),
            Locale::default(),
        );

        let master = publisher.current().unwrap();
        for node in master.all_nodes() {
            let projected = sitemap.node_for_uri(&node.uri).unwrap();
            if node.is_hidden() {
                prop_assert!(projected.is_none(), "{} should be hidden", node.uri);
            }
            if let Some(projected) = projected {
                let chain = sitemap.node_chain_for(&projected).unwrap();
                prop_assert_eq!(chain.last().map(|n| n.uri()), Some(node.uri.as_str()));
                prop_assert!(chain.iter().all(|n| !n.master().is_hidden()));
            }
        }
    }
}

#[test]
fn rebuild_follows_newly_published_sitemap() {
    let publisher = publisher(standard_declaration());
    let s = session(publisher.clone(), MapTranslator::new());
    assert!(s.sitemap.node_for_uri("public/contact").unwrap().is_none());
    assert_eq!(s.sitemap.rebuild_count(), 1);

    publisher
        .build(&build_service(
            standard_declaration().page(page("public/contact", AccessPolicy::Public)),
        ))
        .unwrap();
    assert!(s.sitemap.node_for_uri("public/contact").unwrap().is_some());
    assert_eq!(s.sitemap.rebuild_count(), 2);
}

#[test]
fn sessions_share_one_master_but_see_different_pages() {
    let publisher: Arc<SitemapPublisher> = publisher(standard_declaration());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let publisher = publisher.clone();
            thread::spawn(move || {
                let s = session(publisher, MapTranslator::new());
                if i % 2 == 1 {
                    s.subject.login();
                }
                s.sitemap.node_for_uri("private/home").unwrap().is_some()
            })
        })
        .collect();
    let visible: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(visible, vec![false, true, false, true]);
}

#[test]
fn sorted_roots_follow_mode() {
    let declaration = SitemapDeclaration::new("roots")
        .page(page("c", AccessPolicy::Public).with_position(3))
        .page(page("a", AccessPolicy::Public).with_position(1))
        .page(page("b", AccessPolicy::Public).with_position(2));
    let s = session(publisher(declaration), MapTranslator::new());
    let uris = |mode: SortMode| -> Vec<String> {
        s.sitemap
            .sorted_roots(mode)
            .unwrap()
            .iter()
            .map(|n| n.uri().to_string())
            .collect()
    };
    assert_eq!(uris(SortMode::ascending(SortType::Position)), vec!["a", "b", "c"]);
    assert_eq!(uris(SortMode::descending(SortType::Position)), vec!["c", "b", "a"]);
    assert_eq!(uris(SortMode::ascending(SortType::Insertion)), vec!["c", "a", "b"]);
    assert_eq!(uris(SortMode::NONE), vec!["c", "a", "b"]);
}
