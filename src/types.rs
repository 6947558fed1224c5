//! Core types shared across the sitemap, user sitemap and navigator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// NodeId: identity of a sitemap node, assigned monotonically in insertion order
pub type NodeId = u64;

/// Reference to a translatable label, resolved per locale by a [`crate::i18n::Translate`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelKey(pub String);

impl LabelKey {
    pub fn new(key: impl Into<String>) -> Self {
        LabelKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to the view rendered for a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewType(pub String);

impl ViewType {
    pub fn new(name: impl Into<String>) -> Self {
        ViewType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locale tag, e.g. `en-GB` or `de`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(pub String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Locale(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language part of the tag (`de` for `de-AT`)
    pub fn language(&self) -> &str {
        self.0
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or(&self.0)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale("en".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a URI into its non-empty path segments
pub fn uri_segments(uri: &str) -> Vec<&str> {
    uri.split('/').filter(|s| !s.is_empty()).collect()
}

/// Normalize a URI: trim surrounding slashes and collapse empty segments
pub fn normalize_uri(uri: &str) -> String {
    uri_segments(uri).join("/")
}
