//! Master Sitemap
//!
//! The authoritative tree of every page the application knows about, stored as
//! an arena keyed by [`NodeId`] with explicit parent and children maps, plus a
//! redirect table. A sitemap is populated by one build, checked, then locked;
//! after locking it is shared read-only as `Arc<MasterSitemap>`.

pub mod build;
pub mod checker;
pub mod source;

use crate::error::{SitemapError, SitemapResult};
use crate::tree::{Forest, MasterNode, NodeRecord, StandardPageKey};
use crate::types::{normalize_uri, uri_segments, LabelKey, NodeId, ViewType};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub use build::SitemapBuildService;
pub use checker::{CheckReport, ConsistencyChecker};
pub use source::{DirectSource, FileSource, NodeSource, SitemapDeclaration};

/// The process-wide page tree plus redirect table
#[derive(Debug)]
pub struct MasterSitemap {
    nodes: HashMap<NodeId, Arc<MasterNode>>,
    uri_index: HashMap<String, NodeId>,
    parent_of: HashMap<NodeId, NodeId>,
    children_of: HashMap<NodeId, Vec<NodeId>>,
    roots: Vec<NodeId>,
    /// Redirects in declaration order; a source URI appears at most once
    redirects: Vec<(String, String)>,
    redirect_index: HashMap<String, usize>,
    standard_pages: HashMap<StandardPageKey, String>,
    /// Source and module names that contributed records
    sources: Vec<String>,
    next_id: NodeId,
    locked: bool,
}

impl MasterSitemap {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            uri_index: HashMap::new(),
            parent_of: HashMap::new(),
            children_of: HashMap::new(),
            roots: Vec::new(),
            redirects: Vec::new(),
            redirect_index: HashMap::new(),
            standard_pages: HashMap::new(),
            sources: Vec::new(),
            next_id: 1,
            locked: false,
        }
    }

    fn ensure_unlocked(&self) -> SitemapResult<()> {
        if self.locked {
            return Err(SitemapError::Locked);
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn link(&mut self, id: NodeId, uri: &str) {
        let parent = uri_segments(uri)
            .split_last()
            .filter(|(_, ancestors)| !ancestors.is_empty())
            .and_then(|(_, ancestors)| self.uri_index.get(&ancestors.join("/")).copied());
        match parent {
            Some(parent_id) => {
                self.parent_of.insert(id, parent_id);
                self.children_of.entry(parent_id).or_default().push(id);
            }
            None => self.roots.push(id),
        }
    }

    /// Add a declared page, creating placeholder ancestors as needed.
    ///
    /// Declaring the URI of an existing placeholder fills it in and keeps its
    /// identity; declaring any other existing URI fails.
    pub fn add_node(&mut self, record: NodeRecord) -> SitemapResult<NodeId> {
        self.ensure_unlocked()?;
        let uri = normalize_uri(&record.uri);
        if uri.is_empty() || uri.contains('=') {
            return Err(SitemapError::InvalidUri(record.uri));
        }

        if let Some(&id) = self.uri_index.get(&uri) {
            let existing = &self.nodes[&id];
            if !existing.placeholder {
                return Err(SitemapError::DuplicateUri(uri));
            }
            debug!(uri = %uri, id, "Filling placeholder node");
            let node = MasterNode {
                id,
                uri: uri.clone(),
                label: record.label,
                policy: record.policy,
                position_index: record.position_index,
                view: record.view,
                config: record.config,
                placeholder: false,
            };
            self.nodes.insert(id, Arc::new(node));
            if let Some(key) = record.standard_page {
                self.standard_pages.insert(key, uri);
            }
            return Ok(id);
        }

        let segments: Vec<String> = uri_segments(&uri).iter().map(|s| s.to_string()).collect();
        for depth in 1..segments.len() {
            let ancestor = segments[..depth].join("/");
            if self.uri_index.contains_key(&ancestor) {
                continue;
            }
            let id = self.allocate_id();
            let placeholder = MasterNode {
                id,
                uri: ancestor.clone(),
                label: LabelKey::new(segments[depth - 1].clone()),
                policy: record.policy.clone(),
                position_index: 1,
                view: None,
                config: None,
                placeholder: true,
            };
            self.nodes.insert(id, Arc::new(placeholder));
            self.uri_index.insert(ancestor.clone(), id);
            self.link(id, &ancestor);
        }

        let id = self.allocate_id();
        let node = MasterNode {
            id,
            uri: uri.clone(),
            label: record.label,
            policy: record.policy,
            position_index: record.position_index,
            view: record.view,
            config: record.config,
            placeholder: false,
        };
        self.nodes.insert(id, Arc::new(node));
        self.uri_index.insert(uri.clone(), id);
        self.link(id, &uri);
        if let Some(key) = record.standard_page {
            self.standard_pages.insert(key, uri);
        }
        Ok(id)
    }

    /// Declare that `from` redirects to `to`; a later declaration for the same
    /// source replaces the earlier target
    pub fn add_redirect(&mut self, from: &str, to: &str) -> SitemapResult<()> {
        self.ensure_unlocked()?;
        let from = normalize_uri(from);
        let to = normalize_uri(to);
        if from.is_empty() {
            return Err(SitemapError::InvalidUri(from));
        }
        match self.redirect_index.get(&from) {
            Some(&pos) => self.redirects[pos].1 = to,
            None => {
                self.redirect_index.insert(from.clone(), self.redirects.len());
                self.redirects.push((from, to));
            }
        }
        Ok(())
    }

    /// Register `uri` as a standard page
    pub fn set_standard_page(&mut self, key: StandardPageKey, uri: &str) -> SitemapResult<()> {
        self.ensure_unlocked()?;
        self.standard_pages.insert(key, normalize_uri(uri));
        Ok(())
    }

    /// Replace the view of a node; used to give placeholders a default view
    pub fn set_view(&mut self, id: NodeId, view: ViewType) -> SitemapResult<()> {
        self.ensure_unlocked()?;
        if let Some(node) = self.nodes.get_mut(&id) {
            Arc::make_mut(node).view = Some(view);
        }
        Ok(())
    }

    /// Record the name of a source or module that contributed records
    pub fn record_source(&mut self, name: impl Into<String>) -> SitemapResult<()> {
        self.ensure_unlocked()?;
        let name = name.into();
        if !self.sources.contains(&name) {
            self.sources.push(name);
        }
        Ok(())
    }

    /// Lock the sitemap against further mutation
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_uri(&self, uri: &str) -> bool {
        self.uri_index.contains_key(&normalize_uri(uri))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Arc<MasterNode>> {
        self.nodes.get(&id)
    }

    pub fn node_for_uri(&self, uri: &str) -> Option<&Arc<MasterNode>> {
        self.uri_index
            .get(&normalize_uri(uri))
            .and_then(|id| self.nodes.get(id))
    }

    /// All nodes in identity (insertion) order
    pub fn all_nodes(&self) -> Vec<Arc<MasterNode>> {
        let mut nodes: Vec<_> = self.nodes.values().cloned().collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.children_of.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Children of a node in insertion order
    pub fn children(&self, id: NodeId) -> Vec<Arc<MasterNode>> {
        self.child_ids(id)
            .iter()
            .filter_map(|child| self.nodes.get(child).cloned())
            .collect()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parent_of.get(&id).copied()
    }

    /// Chain of nodes from the root down to and including `id`
    pub fn parent_chain(&self, id: NodeId) -> Vec<Arc<MasterNode>> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.nodes.get(&current) {
                Some(node) => chain.push(node.clone()),
                None => break,
            }
            cursor = self.parent_of(current);
        }
        chain.reverse();
        chain
    }

    pub fn redirects(&self) -> &[(String, String)] {
        &self.redirects
    }

    /// Final target of any redirect chain starting at `uri`
    pub fn redirect_target(&self, uri: &str) -> Option<String> {
        let mut current = normalize_uri(uri);
        let mut target = None;
        // bounded so an unchecked sitemap with a loop cannot hang the caller
        for _ in 0..=self.redirects.len() {
            match self.redirect_index.get(&current) {
                Some(&pos) => {
                    current = self.redirects[pos].1.clone();
                    target = Some(current.clone());
                }
                None => break,
            }
        }
        target
    }

    pub fn standard_page_uri(&self, key: StandardPageKey) -> Option<&str> {
        self.standard_pages.get(&key).map(|s| s.as_str())
    }

    pub fn standard_page_node(&self, key: StandardPageKey) -> Option<&Arc<MasterNode>> {
        self.standard_page_uri(key)
            .and_then(|uri| self.node_for_uri(uri))
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

impl Default for MasterSitemap {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest for MasterSitemap {
    type Node = NodeId;

    fn roots(&self) -> Vec<NodeId> {
        self.roots.clone()
    }

    fn children_of(&self, node: &NodeId) -> Vec<NodeId> {
        self.child_ids(*node).to_vec()
    }
}
