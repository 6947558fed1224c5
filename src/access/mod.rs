//! Access-control evaluation
//!
//! A pure function of the page policy and the subject's state. Denials are
//! split into two kinds: `Unauthenticated` when logging in could grant access,
//! `Unauthorized` when the subject is known but lacks the right.

pub mod subject;

use crate::error::AccessError;
use crate::tree::AccessPolicy;
use crate::types::uri_segments;
use std::fmt;

pub use subject::{SessionSubject, SubjectState};

/// Permission a subject needs to view a page with [`AccessPolicy::Permission`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagePermission {
    parts: Vec<String>,
}

impl PagePermission {
    /// `private/page1` becomes `page:view:private:page1`
    pub fn for_uri(uri: &str) -> Self {
        let mut parts = vec!["page".to_string(), "view".to_string()];
        parts.extend(uri_segments(uri).into_iter().map(str::to_string));
        Self { parts }
    }

    /// Whether a wildcard pattern such as `page:view:private:*` grants this permission.
    ///
    /// `*` matches any single part; a pattern shorter than the permission
    /// grants everything beneath it.
    pub fn implied_by(&self, pattern: &str) -> bool {
        let pattern: Vec<&str> = pattern.split(':').collect();
        if pattern.len() > self.parts.len() {
            return pattern[self.parts.len()..].iter().all(|p| *p == "*")
                && self
                    .parts
                    .iter()
                    .zip(&pattern)
                    .all(|(part, p)| *p == "*" || p == part);
        }
        self.parts
            .iter()
            .zip(&pattern)
            .all(|(part, p)| *p == "*" || p == part)
    }
}

impl fmt::Display for PagePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join(":"))
    }
}

fn identity_denial(uri: &str, subject: &dyn SubjectState) -> AccessError {
    if subject.is_authenticated() || subject.is_remembered() {
        AccessError::Unauthorized {
            uri: uri.to_string(),
        }
    } else {
        AccessError::Unauthenticated {
            uri: uri.to_string(),
        }
    }
}

/// Decide whether `subject` may view the page at `uri` guarded by `policy`
pub fn evaluate(
    policy: &AccessPolicy,
    uri: &str,
    subject: &dyn SubjectState,
) -> Result<(), AccessError> {
    let allowed = match policy {
        AccessPolicy::Public => true,
        AccessPolicy::Guest => !subject.is_authenticated() && !subject.is_remembered(),
        AccessPolicy::Authentication => subject.is_authenticated(),
        AccessPolicy::User => subject.is_authenticated() || subject.is_remembered(),
        AccessPolicy::Roles(roles) => subject.has_all_roles(roles),
        AccessPolicy::Permission => subject.is_permitted(&PagePermission::for_uri(uri)),
    };
    if allowed {
        return Ok(());
    }
    Err(match policy {
        AccessPolicy::Guest => AccessError::Unauthorized {
            uri: uri.to_string(),
        },
        AccessPolicy::Authentication | AccessPolicy::User => AccessError::Unauthenticated {
            uri: uri.to_string(),
        },
        AccessPolicy::Roles(_) | AccessPolicy::Permission | AccessPolicy::Public => {
            identity_denial(uri, subject)
        }
    })
}

/// Convenience wrapper for filtering
pub fn is_allowed(policy: &AccessPolicy, uri: &str, subject: &dyn SubjectState) -> bool {
    evaluate(policy, uri, subject).is_ok()
}
