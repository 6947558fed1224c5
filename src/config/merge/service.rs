//! MergeService: orchestrates sources and deserializes to SitenavConfig.

use super::merge_policy;
use crate::config::sources::{environment, file};
use crate::config::SitenavConfig;
use config::ConfigError;
use std::path::Path;
use tracing::debug;

pub struct MergeService;

impl MergeService {
    /// Defaults (lowest), then `sitenav.toml` in `dir` if present, then environment (highest).
    pub fn load(dir: &Path) -> Result<SitenavConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_to_builder(builder, dir)?;
        let builder = environment::add_to_builder(builder)?;
        Self::finish(builder)
    }

    /// Load from an explicit file, which must exist, with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<SitenavConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(config::File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<SitenavConfig, ConfigError> {
        let config: SitenavConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(sources = ?config.sitemap.sources, locale = %config.locale, "Loaded configuration");
        Ok(config)
    }
}
