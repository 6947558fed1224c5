//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::SitenavConfig;
use config::ConfigError;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `sitenav.toml` from `dir` (if present) and the environment.
    pub fn load(dir: &Path) -> Result<SitenavConfig, ConfigError> {
        MergeService::load(dir)
    }

    pub fn load_from_file(path: &Path) -> Result<SitenavConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    pub fn default() -> SitenavConfig {
        SitenavConfig::default()
    }
}
