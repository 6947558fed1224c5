//! Optional `sitenav.toml` in a directory

use crate::config::CONFIG_FILE_NAME;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    Ok(builder.add_source(
        File::from(path.as_path())
            .format(FileFormat::Toml)
            .required(false),
    ))
}
