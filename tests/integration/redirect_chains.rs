//! Incremental cycle detection over redirect chains
//!
//! Every redirect source has exactly one target, so each cycle in the declared
//! table is closed by exactly one rejected edge, whatever the declaration order.

use proptest::prelude::*;
use sitenav::error::SitemapError;
use sitenav::sitemap::{ConsistencyChecker, MasterSitemap};

fn sitemap_with(redirects: &[(String, String)]) -> MasterSitemap {
    let mut sitemap = MasterSitemap::new();
    for (from, to) in redirects {
        sitemap.add_redirect(from, to).unwrap();
    }
    sitemap
}

/// `len` edges r0 -> r1 -> ... -> r{len}, optionally closed back to r0
fn chain(prefix: &str, len: usize, closed: bool) -> Vec<(String, String)> {
    let mut edges: Vec<(String, String)> = (0..len)
        .map(|i| (format!("{prefix}{i}"), format!("{prefix}{}", i + 1)))
        .collect();
    if closed {
        edges.push((format!("{prefix}{len}"), format!("{prefix}0")));
    }
    edges
}

proptest! {
    #[test]
    fn open_chains_never_report_loops(len in 3usize..12) {
        let sitemap = sitemap_with(&chain("r", len, false));
        prop_assert!(ConsistencyChecker::redirect_loops(&sitemap).is_empty());
        let expected = format!("r{len}");
        prop_assert_eq!(sitemap.redirect_target("r0"), Some(expected));
    }

    #[test]
    fn each_closed_chain_reports_exactly_one_loop(
        lens in proptest::collection::vec(3usize..8, 1..4),
        rotation in 0usize..16,
    ) {
        let mut edges = Vec::new();
        for (i, len) in lens.iter().enumerate() {
            let mut cycle = chain(&format!("c{i}_"), *len, true);
            let shift = rotation % cycle.len();
            cycle.rotate_left(shift);
            edges.extend(cycle);
        }
        let mut sitemap = sitemap_with(&edges);
        let loops = ConsistencyChecker::redirect_loops(&sitemap);
        prop_assert_eq!(loops.len(), lens.len());

        let failed = matches!(
            ConsistencyChecker::new().check(&mut sitemap),
            Err(SitemapError::Inconsistent { .. })
        );
        prop_assert!(failed);
        prop_assert!(!sitemap.is_locked());
    }

    #[test]
    fn tails_into_a_cycle_add_no_extra_loops(len in 3usize..8, tail in 1usize..5) {
        let mut edges = chain("c", len, true);
        for i in 0..tail {
            let to = if i + 1 == tail { "c1".to_string() } else { format!("t{}", i + 1) };
            edges.push((format!("t{i}"), to));
        }
        let sitemap = sitemap_with(&edges);
        prop_assert_eq!(ConsistencyChecker::redirect_loops(&sitemap).len(), 1);
    }
}

#[test]
fn self_redirect_is_a_loop() {
    let sitemap = sitemap_with(&[("a".to_string(), "a".to_string())]);
    assert_eq!(
        ConsistencyChecker::redirect_loops(&sitemap),
        vec!["redirecting a to a would cause a loop"]
    );
}

#[test]
fn redeclared_redirect_replaces_target() {
    let mut sitemap = MasterSitemap::new();
    sitemap.add_redirect("a", "b").unwrap();
    sitemap.add_redirect("b", "a").unwrap();
    sitemap.add_redirect("b", "c").unwrap();
    assert!(ConsistencyChecker::redirect_loops(&sitemap).is_empty());
    assert_eq!(sitemap.redirect_target("a").as_deref(), Some("c"));
}
