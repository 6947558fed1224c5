//! Error types for sitenav

use thiserror::Error;

/// Errors raised while building, checking or mutating a sitemap
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SitemapError {
    /// Mutation attempted after the sitemap was locked
    #[error("Sitemap is locked and cannot be modified")]
    Locked,

    /// A URI was declared twice
    #[error("Duplicate URI: {0}")]
    DuplicateUri(String),

    /// A URI that cannot name a page (empty, or contains parameters)
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// The consistency check failed; `report` lists every problem found
    #[error("Sitemap is inconsistent:\n{report}")]
    Inconsistent { report: String, loops: Vec<String> },

    /// No configured source name matched a registered source
    #[error("No valid sources found")]
    NoValidSource,

    /// Another build holds the build gate
    #[error("A sitemap build is already in progress")]
    BuildInProgress,

    /// No sitemap has been published yet
    #[error("Sitemap has not been built")]
    NotBuilt,

    /// A source failed while loading records
    #[error("Source {source_name} failed: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    /// A declaration file could not be read or parsed
    #[error("Declaration error: {0}")]
    Declaration(String),
}

impl SitemapError {
    pub fn source_failed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        SitemapError::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn declaration(msg: impl Into<String>) -> Self {
        SitemapError::Declaration(msg.into())
    }
}

/// Access denial produced by policy evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The subject must (re)authenticate before the page can be shown
    #[error("Authentication required for {uri}")]
    Unauthenticated { uri: String },

    /// The subject is known but lacks the required rights
    #[error("Not authorized to view {uri}")]
    Unauthorized { uri: String },
}

impl AccessError {
    pub fn uri(&self) -> &str {
        match self {
            AccessError::Unauthenticated { uri } | AccessError::Unauthorized { uri } => uri,
        }
    }
}

/// Errors surfaced by the navigator to its caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The target does not exist in the user sitemap
    #[error("Unresolved URI: {0}")]
    UnresolvedUri(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    /// A required navigation parameter was absent
    #[error("Missing parameter '{key}' in {fragment}")]
    MissingParameter { key: String, fragment: String },

    #[error(transparent)]
    Sitemap(#[from] SitemapError),

    /// The view for a page could not be created
    #[error("View error: {0}")]
    View(String),
}

/// Errors raised while loading configuration or initialising logging
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sitemap operations
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

/// Result type alias for navigation operations
pub type NavigationResult<T> = std::result::Result<T, NavigationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_converts_into_navigation_error() {
        let err: NavigationError = AccessError::Unauthorized {
            uri: "private/page1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Not authorized to view private/page1");
    }

    #[test]
    fn test_inconsistent_message_carries_report() {
        let err = SitemapError::Inconsistent {
            report: "redirecting a to b would cause a loop".to_string(),
            loops: vec!["a -> b".to_string()],
        };
        assert!(err.to_string().contains("would cause a loop"));
    }
}
