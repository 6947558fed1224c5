//! Navigation state and fragment parsing

use crate::error::{NavigationError, NavigationResult};
use crate::types::normalize_uri;
use std::fmt;
use tracing::debug;

/// Parsed location: page path segments plus ordered `key=value` parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NavigationState {
    segments: Vec<String>,
    parameters: Vec<String>,
}

impl NavigationState {
    pub fn new(segments: Vec<String>, parameters: Vec<String>) -> Self {
        Self {
            segments,
            parameters,
        }
    }

    /// State for a page URI with no parameters
    pub fn from_uri(uri: &str) -> Self {
        let segments = normalize_uri(uri)
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            segments,
            parameters: Vec::new(),
        }
    }

    /// Page URI without parameters
    pub fn virtual_page(&self) -> String {
        self.segments.join("/")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Value of the first `key=value` parameter with this key
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.iter().find_map(|p| {
            p.split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }

    pub fn require_parameter(&self, key: &str) -> NavigationResult<&str> {
        self.parameter(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| NavigationError::MissingParameter {
                key: key.to_string(),
                fragment: self.to_string(),
            })
    }

    /// Same parameters, different page; used when following redirects
    pub fn with_virtual_page(&self, uri: &str) -> Self {
        Self {
            segments: Self::from_uri(uri).segments,
            parameters: self.parameters.clone(),
        }
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.push(format!("{}={}", key, value));
        self
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        parts.extend(self.parameters.iter().map(String::as_str));
        f.write_str(&parts.join("/"))
    }
}

/// Converts between raw fragments and navigation states
pub trait FragmentParser: Send + Sync {
    fn parse(&self, fragment: &str) -> NavigationState;
    fn render(&self, state: &NavigationState) -> String;
}

/// Fragments of the form `page/sub/key=value/other=value`.
///
/// Path segments end at the first parameter; plain segments after a parameter
/// are discarded. With `use_bang` fragments render as `!page/...` and a leading
/// `!` is accepted when parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictFragmentParser {
    pub use_bang: bool,
}

impl StrictFragmentParser {
    pub fn new(use_bang: bool) -> Self {
        Self { use_bang }
    }
}

impl FragmentParser for StrictFragmentParser {
    fn parse(&self, fragment: &str) -> NavigationState {
        let trimmed = fragment.trim().trim_start_matches('#');
        let trimmed = trimmed.strip_prefix('!').unwrap_or(trimmed);

        let mut segments = Vec::new();
        let mut parameters = Vec::new();
        for part in trimmed.split('/').filter(|s| !s.is_empty()) {
            if part.contains('=') {
                parameters.push(part.to_string());
            } else if parameters.is_empty() {
                segments.push(part.to_string());
            } else {
                debug!(segment = part, fragment, "Discarding path segment after parameters");
            }
        }
        NavigationState::new(segments, parameters)
    }

    fn render(&self, state: &NavigationState) -> String {
        if self.use_bang {
            format!("!{}", state)
        } else {
            state.to_string()
        }
    }
}
