//! Configuration
//!
//! Layered loading: built-in defaults, then an optional `sitenav.toml`, then
//! `SITENAV__SECTION__KEY` environment variables.

pub mod facade;

pub mod merge {
    pub mod merge_policy;
    pub mod service;
}

pub mod sources {
    pub mod environment;
    pub mod file;
}

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::sitemap::{ConsistencyChecker, DirectSource, FileSource, SitemapBuildService};
use crate::sort::SortMode;
use crate::tree::StandardPageKey;
use crate::types::{Locale, ViewType};
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "sitenav.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SitenavConfig {
    /// Locale new sessions start in
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SitenavConfig {
    /// Reject values serde accepts but the engine cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.navigation.sort_mode()?;
        if self.sitemap.sources.is_empty() {
            return Err(ConfigError::Message(
                "sitemap.sources must name at least one source".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Source names in load order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    /// Declaration files read by the `file` source
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// View given to placeholder pages that declare none
    #[serde(default)]
    pub default_view: Option<ViewType>,
}

fn default_sources() -> Vec<String> {
    vec![DirectSource::NAME.to_string()]
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            files: Vec::new(),
            default_view: None,
        }
    }
}

impl SitemapConfig {
    /// Build service for the configured sources, with `direct` supplying in-code modules
    pub fn build_service(&self, direct: DirectSource) -> SitemapBuildService {
        SitemapBuildService::new(self.sources.clone())
            .register(Arc::new(direct))
            .register(Arc::new(FileSource::new(self.files.clone())))
            .with_checker(ConsistencyChecker::new().with_default_view(self.default_view.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Render fragments as `!page/...`
    #[serde(default)]
    pub use_bang: bool,
    /// Where login goes when there is no page to return to
    #[serde(default = "default_login_home")]
    pub login_home: StandardPageKey,
    #[serde(default = "default_logout_target")]
    pub logout_target: StandardPageKey,
    /// Sort mode for listings, e.g. `position:asc` or `alphabetic:desc`
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_login_home() -> StandardPageKey {
    StandardPageKey::PrivateHome
}

fn default_logout_target() -> StandardPageKey {
    StandardPageKey::PublicHome
}

fn default_sort() -> String {
    SortMode::default().to_string()
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            use_bang: false,
            login_home: default_login_home(),
            logout_target: default_logout_target(),
            default_sort: default_sort(),
        }
    }
}

impl NavigationConfig {
    pub fn sort_mode(&self) -> Result<SortMode, ConfigError> {
        self.default_sort
            .parse()
            .map_err(|e: String| ConfigError::Message(format!("navigation.default_sort: {}", e)))
    }
}
