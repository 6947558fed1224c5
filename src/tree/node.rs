//! Page node types: declared records and the nodes a master sitemap holds

use crate::types::{uri_segments, LabelKey, NodeId, ViewType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Access-control policy attached to a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Visible to everyone
    Public,
    /// Visible only to subjects that are neither authenticated nor remembered
    Guest,
    /// Requires an authenticated subject
    Authentication,
    /// Requires an authenticated or remembered subject
    User,
    /// Requires the page permission derived from the node URI
    Permission,
    /// Requires every listed role
    Roles(BTreeSet<String>),
}

impl AccessPolicy {
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessPolicy::Roles(roles.into_iter().map(Into::into).collect())
    }

    /// Roles required by this policy; empty unless `Roles`
    pub fn required_roles(&self) -> BTreeSet<String> {
        match self {
            AccessPolicy::Roles(roles) => roles.clone(),
            _ => BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccessPolicy::Public => "public",
            AccessPolicy::Guest => "guest",
            AccessPolicy::Authentication => "authentication",
            AccessPolicy::User => "user",
            AccessPolicy::Permission => "permission",
            AccessPolicy::Roles(_) => "roles",
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        AccessPolicy::Public
    }
}

/// Pages the navigator needs to find without knowing their URIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardPageKey {
    PublicHome,
    PrivateHome,
    Login,
    Logout,
}

impl StandardPageKey {
    pub const ALL: [StandardPageKey; 4] = [
        StandardPageKey::PublicHome,
        StandardPageKey::PrivateHome,
        StandardPageKey::Login,
        StandardPageKey::Logout,
    ];
}

/// Opaque per-page configuration handed through to the view layer
pub type PageConfig = BTreeMap<String, String>;

fn default_position_index() -> i32 {
    1
}

/// Node record produced by a source before it is placed in a sitemap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub uri: String,
    pub label: LabelKey,
    /// `"public"` style names, or `{ roles = [...] }` in both TOML and YAML
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub policy: AccessPolicy,
    /// Negative values hide the page from every user sitemap
    #[serde(default = "default_position_index")]
    pub position_index: i32,
    #[serde(default)]
    pub view: Option<ViewType>,
    #[serde(default)]
    pub config: Option<PageConfig>,
    #[serde(default)]
    pub standard_page: Option<StandardPageKey>,
}

impl NodeRecord {
    pub fn new(uri: impl Into<String>, label: impl Into<String>, policy: AccessPolicy) -> Self {
        Self {
            uri: uri.into(),
            label: LabelKey::new(label),
            policy,
            position_index: default_position_index(),
            view: None,
            config: None,
            standard_page: None,
        }
    }

    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(ViewType::new(view));
        self
    }

    pub fn with_position(mut self, position_index: i32) -> Self {
        self.position_index = position_index;
        self
    }

    pub fn with_standard_page(mut self, key: StandardPageKey) -> Self {
        self.standard_page = Some(key);
        self
    }

    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// A page held by a master sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterNode {
    pub id: NodeId,
    /// Full path from the root, without leading or trailing slashes
    pub uri: String,
    pub label: LabelKey,
    pub policy: AccessPolicy,
    pub position_index: i32,
    pub view: Option<ViewType>,
    pub config: Option<PageConfig>,
    /// True when the node was created only as the ancestor of a declared page
    pub placeholder: bool,
}

impl MasterNode {
    /// Last path component of the URI
    pub fn segment(&self) -> &str {
        uri_segments(&self.uri).last().copied().unwrap_or("")
    }

    pub fn required_roles(&self) -> BTreeSet<String> {
        self.policy.required_roles()
    }

    /// Hidden nodes never appear in a user sitemap
    pub fn is_hidden(&self) -> bool {
        self.position_index < 0
    }

    /// URI of the parent, or None for a root
    pub fn parent_uri(&self) -> Option<String> {
        let segments = uri_segments(&self.uri);
        if segments.len() <= 1 {
            None
        } else {
            Some(segments[..segments.len() - 1].join("/"))
        }
    }
}
