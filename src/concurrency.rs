//! Exclusive sitemap builds and atomic publication
//!
//! At most one build runs at a time. A finished, locked sitemap replaces the
//! published one in a single swap; sessions holding the previous `Arc` keep a
//! consistent view until they next read and see the generation change.

use crate::error::{SitemapError, SitemapResult};
use crate::sitemap::build::{BuiltSitemap, SitemapBuildService};
use crate::sitemap::MasterSitemap;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Holds the currently published master sitemap
pub struct SitemapPublisher {
    /// Held for the whole duration of a build
    build_gate: Mutex<()>,
    current: RwLock<Option<Arc<MasterSitemap>>>,
    /// Incremented on every publication; 0 means nothing published yet
    generation: AtomicU64,
}

impl SitemapPublisher {
    pub fn new() -> Self {
        Self {
            build_gate: Mutex::new(()),
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Run a build, waiting for any build already in progress
    pub fn build(&self, service: &SitemapBuildService) -> SitemapResult<BuiltSitemapSummary> {
        let _gate = self.build_gate.lock();
        self.run(service)
    }

    /// Run a build, failing immediately if another build is in progress
    pub fn try_build(&self, service: &SitemapBuildService) -> SitemapResult<BuiltSitemapSummary> {
        let _gate = self
            .build_gate
            .try_lock()
            .ok_or(SitemapError::BuildInProgress)?;
        self.run(service)
    }

    fn run(&self, service: &SitemapBuildService) -> SitemapResult<BuiltSitemapSummary> {
        let BuiltSitemap {
            sitemap,
            report,
            contributions,
        } = service.build()?;
        let sitemap = Arc::new(sitemap);
        let generation = self.swap(sitemap.clone());
        Ok(BuiltSitemapSummary {
            sitemap,
            generation,
            warnings: report.warnings,
            contributions,
        })
    }

    /// Publish a sitemap built elsewhere; it must already be locked
    pub fn publish(&self, sitemap: MasterSitemap) -> SitemapResult<u64> {
        if !sitemap.is_locked() {
            return Err(SitemapError::NotBuilt);
        }
        let _gate = self.build_gate.lock();
        Ok(self.swap(Arc::new(sitemap)))
    }

    fn swap(&self, sitemap: Arc<MasterSitemap>) -> u64 {
        let mut current = self.current.write();
        *current = Some(sitemap);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, "Published sitemap");
        generation
    }

    /// The published sitemap
    pub fn current(&self) -> SitemapResult<Arc<MasterSitemap>> {
        self.current.read().clone().ok_or(SitemapError::NotBuilt)
    }

    /// Published sitemap together with its generation, read consistently
    pub fn snapshot(&self) -> SitemapResult<(Arc<MasterSitemap>, u64)> {
        let current = self.current.read();
        let sitemap = current.clone().ok_or(SitemapError::NotBuilt)?;
        Ok((sitemap, self.generation.load(Ordering::SeqCst)))
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Default for SitemapPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a publishing build
#[derive(Debug, Clone)]
pub struct BuiltSitemapSummary {
    pub sitemap: Arc<MasterSitemap>,
    pub generation: u64,
    pub warnings: Vec<String>,
    pub contributions: Vec<(String, Vec<String>)>,
}
