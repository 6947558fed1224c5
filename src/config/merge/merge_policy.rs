//! Built-in defaults every load starts from

use crate::config::SitenavConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, FileFormat};

/// Builder seeded with the serialized default configuration, so later sources only override what they name
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = toml::to_string(&SitenavConfig::default())
        .map_err(|e| ConfigError::Message(format!("Failed to serialize defaults: {}", e)))?;
    Ok(Config::builder().add_source(config::File::from_str(&defaults, FileFormat::Toml)))
}
