//! Environment variable source: SITENAV__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
///
/// `SITENAV__NAVIGATION__USE_BANG=true` sets `navigation.use_bang`; list keys
/// take comma-separated values.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("SITENAV")
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("sitemap.sources")
            .with_list_parse_key("sitemap.files")
            .try_parsing(true),
    ))
}
