//! Sitemap Build Service
//!
//! Loads every configured source in order into a fresh sitemap, runs the
//! consistency checker and locks the result. Any failure fails the whole
//! build; nothing partial is ever returned.

use crate::error::{SitemapError, SitemapResult};
use crate::sitemap::checker::{CheckReport, ConsistencyChecker};
use crate::sitemap::source::NodeSource;
use crate::sitemap::MasterSitemap;
use std::sync::Arc;
use tracing::{info, warn};

/// A checked and locked sitemap with the diagnostics gathered building it
#[derive(Debug)]
pub struct BuiltSitemap {
    pub sitemap: MasterSitemap,
    pub report: CheckReport,
    /// (source name, module names it contributed) in load order
    pub contributions: Vec<(String, Vec<String>)>,
}

/// Orchestrates source loading, checking and locking
pub struct SitemapBuildService {
    /// Source names in load order, as configured
    configured: Vec<String>,
    registered: Vec<Arc<dyn NodeSource>>,
    checker: ConsistencyChecker,
}

impl SitemapBuildService {
    pub fn new(configured: Vec<String>) -> Self {
        Self {
            configured,
            registered: Vec::new(),
            checker: ConsistencyChecker::new(),
        }
    }

    /// Make a source selectable by its name
    pub fn register(mut self, source: Arc<dyn NodeSource>) -> Self {
        self.registered.push(source);
        self
    }

    pub fn with_checker(mut self, checker: ConsistencyChecker) -> Self {
        self.checker = checker;
        self
    }

    fn resolve_sources(&self) -> SitemapResult<Vec<Arc<dyn NodeSource>>> {
        let mut resolved = Vec::new();
        for name in &self.configured {
            match self.registered.iter().find(|s| s.name() == name) {
                Some(source) => resolved.push(source.clone()),
                None => warn!(source = %name, "Ignoring unrecognised sitemap source"),
            }
        }
        if resolved.is_empty() {
            return Err(SitemapError::NoValidSource);
        }
        Ok(resolved)
    }

    /// Build a new locked sitemap from the configured sources
    pub fn build(&self) -> SitemapResult<BuiltSitemap> {
        let sources = self.resolve_sources()?;
        info!(sources = sources.len(), "Building sitemap");

        let mut sitemap = MasterSitemap::new();
        let mut contributions = Vec::new();
        for source in sources {
            let modules = source.load_into(&mut sitemap)?;
            contributions.push((source.name().to_string(), modules));
        }

        let report = self.checker.check(&mut sitemap)?;
        sitemap.lock();
        info!(
            nodes = sitemap.node_count(),
            redirects = sitemap.redirects().len(),
            warnings = report.warnings.len(),
            "Sitemap built and locked"
        );
        Ok(BuiltSitemap {
            sitemap,
            report,
            contributions,
        })
    }
}
