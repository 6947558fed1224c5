//! Consistency checks run on a populated sitemap before it is locked
//!
//! Redirects form a directed graph over URIs. Edges are inserted one at a time
//! and an edge that would close a cycle is skipped and reported, so a single
//! pass reports every loop. Because each source URI has exactly one target the
//! graph is functional: every cycle is closed by exactly one skipped edge, and
//! a skipped edge can never be part of a cycle completed later.

use crate::error::{SitemapError, SitemapResult};
use crate::sitemap::MasterSitemap;
use crate::tree::{walk, NodeCounter, StandardPageKey};
use crate::types::ViewType;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of a successful check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Problems that do not prevent publication
    pub warnings: Vec<String>,
    /// Placeholders given the default view
    pub defaulted_views: usize,
}

/// Validates a sitemap and repairs what it safely can
#[derive(Debug, Clone, Default)]
pub struct ConsistencyChecker {
    default_view: Option<ViewType>,
}

struct RedirectGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl RedirectGraph {
    fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    fn node(&mut self, uri: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(uri) {
            return idx;
        }
        let idx = self.graph.add_node(uri.to_string());
        self.index.insert(uri.to_string(), idx);
        idx
    }

    /// Insert `from -> to` unless it would close a cycle; returns false when skipped
    fn try_add_edge(&mut self, from: &str, to: &str) -> bool {
        let from_idx = self.node(from);
        let to_idx = self.node(to);
        if has_path_connecting(&self.graph, to_idx, from_idx, None) {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, ());
        true
    }
}

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give view-less placeholder nodes this view instead of warning about them
    pub fn with_default_view(mut self, view: Option<ViewType>) -> Self {
        self.default_view = view;
        self
    }

    /// Every redirect that would close a loop, in declaration order
    pub fn redirect_loops(sitemap: &MasterSitemap) -> Vec<String> {
        let mut graph = RedirectGraph::new();
        let mut loops = Vec::new();
        for (from, to) in sitemap.redirects() {
            if !graph.try_add_edge(from, to) {
                loops.push(format!("redirecting {} to {} would cause a loop", from, to));
            }
        }
        loops
    }

    /// Check `sitemap`; fails with [`SitemapError::Inconsistent`] on any redirect loop
    pub fn check(&self, sitemap: &mut MasterSitemap) -> SitemapResult<CheckReport> {
        let loops = Self::redirect_loops(sitemap);
        if !loops.is_empty() {
            let report = Self::failure_report(sitemap, &loops);
            warn!(loops = loops.len(), "Sitemap consistency check failed");
            return Err(SitemapError::Inconsistent { report, loops });
        }

        let mut report = CheckReport::default();

        let missing_views: Vec<_> = sitemap
            .all_nodes()
            .into_iter()
            .filter(|n| n.view.is_none())
            .collect();
        for node in missing_views {
            match &self.default_view {
                Some(view) => {
                    sitemap.set_view(node.id, view.clone())?;
                    report.defaulted_views += 1;
                }
                None => report
                    .warnings
                    .push(format!("node '{}' has no view", node.uri)),
            }
        }

        for (from, to) in sitemap.redirects() {
            if !sitemap.has_uri(to) && sitemap.redirect_target(to).is_none() {
                report
                    .warnings
                    .push(format!("redirect {} -> {} targets an unknown page", from, to));
            }
        }

        for key in StandardPageKey::ALL {
            match sitemap.standard_page_uri(key) {
                None => report
                    .warnings
                    .push(format!("standard page {:?} is not defined", key)),
                Some(uri) if !sitemap.has_uri(uri) => report.warnings.push(format!(
                    "standard page {:?} points at unknown page {}",
                    key, uri
                )),
                Some(_) => {}
            }
        }

        let mut reachable = NodeCounter::default();
        walk(&*sitemap, &mut reachable);
        if reachable.count != sitemap.node_count() {
            report.warnings.push(format!(
                "{} of {} nodes are unreachable from the roots",
                sitemap.node_count() - reachable.count,
                sitemap.node_count()
            ));
        }

        for warning in &report.warnings {
            warn!("{}", warning);
        }
        debug!(
            nodes = sitemap.node_count(),
            redirects = sitemap.redirects().len(),
            "Sitemap consistency check passed"
        );
        Ok(report)
    }

    fn failure_report(sitemap: &MasterSitemap, loops: &[String]) -> String {
        let mut report = String::from("Sitemap check failed\n");
        let sources = if sitemap.sources().is_empty() {
            "(none recorded)".to_string()
        } else {
            sitemap.sources().join(", ")
        };
        report.push_str(&format!("Sources: {}\n", sources));
        report.push_str("Redirect loops:\n");
        for line in loops {
            report.push_str(&format!("  - {}\n", line));
        }
        report
    }
}
