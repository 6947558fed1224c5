//! Logging
//!
//! Structured logging through `tracing`. Level, format and destination come from
//! the `[logging]` config section and can be overridden with `SITENAV_LOG`,
//! `SITENAV_LOG_MODULES`, `SITENAV_LOG_FORMAT`, `SITENAV_LOG_OUTPUT` and
//! `SITENAV_LOG_FILE`.

use crate::error::SetupError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Resolve the log file path: explicit path, then `SITENAV_LOG_FILE`, then config, then the platform state directory.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, SetupError> {
    if let Some(p) = cli_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    if let Ok(env_path) = std::env::var("SITENAV_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    default_log_file_path()
}

fn default_log_file_path() -> Result<PathBuf, SetupError> {
    let project_dirs = directories::ProjectDirs::from("", "sitenav", "sitenav").ok_or_else(|| {
        SetupError::Config("Could not determine platform directories for log file".to_string())
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("sitenav.log"))
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// json or text
    #[serde(default = "default_format")]
    pub format: String,

    /// stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Text format on a terminal only
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `sitenav::navigation = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Install the global subscriber.
///
/// Environment variables win over `config`, which wins over defaults.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), SetupError> {
    if config.map(|c| !c.enabled).unwrap_or(false) {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .init();
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true) && !output.file;
    let writer = make_writer(&output, config.and_then(|c| c.file.clone()))?;

    let subscriber = Registry::default().with(filter);
    if format == "json" {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .init();
    }
    Ok(())
}

fn open_log_file(config_file: Option<PathBuf>) -> Result<std::fs::File, SetupError> {
    let path = resolve_log_file_path(None, config_file)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?)
}

fn make_writer(
    output: &OutputDestinations,
    config_file: Option<PathBuf>,
) -> Result<BoxMakeWriter, SetupError> {
    let writer = match (output.stdout, output.stderr, output.file) {
        (_, true, true) => {
            BoxMakeWriter::new(Mutex::new(open_log_file(config_file)?).and(std::io::stderr))
        }
        (_, false, true) => BoxMakeWriter::new(Mutex::new(open_log_file(config_file)?)),
        (true, true, false) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        (false, true, false) => BoxMakeWriter::new(std::io::stderr),
        _ => BoxMakeWriter::new(std::io::stdout),
    };
    Ok(writer)
}

fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, SetupError> {
    if let Ok(filter) = EnvFilter::try_from_env("SITENAV_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }
    let mut filter = EnvFilter::new(level);

    let mut directives: Vec<String> = config
        .map(|c| {
            c.modules
                .iter()
                .map(|(module, level)| format!("{}={}", module, level))
                .collect()
        })
        .unwrap_or_default();
    if let Ok(modules) = std::env::var("SITENAV_LOG_MODULES") {
        directives.extend(
            modules
                .split(',')
                .filter_map(|spec| spec.split_once('='))
                .map(|(module, level)| format!("{}={}", module.trim(), level.trim())),
        );
    }
    for directive in directives {
        filter = filter.add_directive(directive.parse().map_err(|e| {
            SetupError::Config(format!("Invalid log directive '{}': {}", directive, e))
        })?);
    }
    Ok(filter)
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<String, SetupError> {
    if let Ok(format) = std::env::var("SITENAV_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(SetupError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }
    Ok(format.to_string())
}

#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, SetupError> {
    if let Ok(output) = std::env::var("SITENAV_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    parse_output_destinations(config.map(|c| c.output.as_str()).unwrap_or("stderr"))
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, SetupError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        _ => {
            return Err(SetupError::Config(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
        assert!(config.file.is_none());
    }

    #[test]
    fn test_parse_output_destinations() {
        assert_eq!(
            parse_output_destinations("file+stderr").unwrap(),
            OutputDestinations {
                stdout: false,
                stderr: true,
                file: true
            }
        );
        assert_eq!(
            parse_output_destinations("both").unwrap(),
            OutputDestinations {
                stdout: true,
                stderr: true,
                file: false
            }
        );
        assert!(parse_output_destinations("syslog").is_err());
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        if std::env::var("SITENAV_LOG_FORMAT").is_err() {
            assert!(determine_format(Some(&config)).is_err());
        }
    }

    #[test]
    fn test_explicit_log_file_wins() {
        let explicit = Some(PathBuf::from("/tmp/explicit.log"));
        let config = Some(PathBuf::from("/tmp/config.log"));
        let path = resolve_log_file_path(explicit, config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/explicit.log"));
    }

    #[test]
    fn test_default_log_file_name() {
        if std::env::var("SITENAV_LOG_FILE").is_err() {
            let path = resolve_log_file_path(None, None).unwrap();
            assert!(path.ends_with("sitenav.log"));
        }
    }
}
