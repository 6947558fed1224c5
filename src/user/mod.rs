//! User Sitemap
//!
//! A per-session projection of the published master sitemap: only the pages the
//! session's subject may see, labelled for the session locale. The projection
//! is rebuilt lazily; login/logout and locale changes only mark it dirty, and
//! the next read performs a single rebuild however many notifications arrived.

pub mod node;

use crate::access::{is_allowed, SubjectState};
use crate::concurrency::SitemapPublisher;
use crate::error::{SitemapError, SitemapResult};
use crate::i18n::{Collator, Translate};
use crate::navigation::NavigationState;
use crate::sitemap::MasterSitemap;
use crate::sort::{sort, SortMode};
use crate::tree::{walk, NodeCollector, StandardPageKey};
use crate::types::{normalize_uri, Locale, NodeId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

pub use node::UserNode;

/// One built projection
#[derive(Debug)]
pub struct UserTree {
    master: Arc<MasterSitemap>,
    generation: u64,
    locale: Locale,
    nodes: HashMap<NodeId, UserNode>,
    uri_index: HashMap<String, NodeId>,
    parent_of: HashMap<NodeId, NodeId>,
    children_of: HashMap<NodeId, Vec<NodeId>>,
    roots: Vec<NodeId>,
}

impl UserTree {
    /// Project `master` for `subject`, keeping visible nodes with a position index of 0 or more.
    ///
    /// A visible node whose ancestors are filtered out attaches to its nearest
    /// visible ancestor, or becomes a root.
    pub fn build(
        master: Arc<MasterSitemap>,
        generation: u64,
        subject: &dyn SubjectState,
        translator: &dyn Translate,
        collator: &dyn Collator,
        locale: Locale,
    ) -> Self {
        let mut order = NodeCollector::default();
        walk(master.as_ref(), &mut order);

        let mut tree = UserTree {
            master: master.clone(),
            generation,
            locale,
            nodes: HashMap::new(),
            uri_index: HashMap::new(),
            parent_of: HashMap::new(),
            children_of: HashMap::new(),
            roots: Vec::new(),
        };

        for id in order.nodes {
            let node = match master.node(id) {
                Some(node) => node,
                None => continue,
            };
            if node.is_hidden() || !is_allowed(&node.policy, &node.uri, subject) {
                continue;
            }
            let label = translator.label_for(&node.label, &tree.locale);
            let key = collator.collation_key(&label, &tree.locale);

            let mut ancestor = master.parent_of(id);
            while let Some(candidate) = ancestor {
                if tree.nodes.contains_key(&candidate) {
                    break;
                }
                ancestor = master.parent_of(candidate);
            }
            match ancestor {
                Some(parent) => {
                    tree.parent_of.insert(id, parent);
                    tree.children_of.entry(parent).or_default().push(id);
                }
                None => tree.roots.push(id),
            }
            tree.uri_index.insert(node.uri.clone(), id);
            tree.nodes.insert(id, UserNode::new(node.clone(), label, key));
        }
        tree
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&UserNode> {
        self.nodes.get(&id)
    }

    pub fn node_for_uri(&self, uri: &str) -> Option<&UserNode> {
        self.uri_index
            .get(&normalize_uri(uri))
            .and_then(|id| self.nodes.get(id))
    }

    pub fn roots(&self) -> Vec<UserNode> {
        self.roots
            .iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect()
    }

    pub fn children(&self, id: NodeId) -> Vec<UserNode> {
        self.children_of
            .get(&id)
            .map(|ids| ids.iter().filter_map(|c| self.nodes.get(c).cloned()).collect())
            .unwrap_or_default()
    }

    /// Visible chain ending at `id`, root first.
    ///
    /// Each step goes to the nearest visible ancestor, so filtered-out
    /// ancestors are skipped rather than ending the chain.
    pub fn node_chain_for(&self, id: NodeId) -> Vec<UserNode> {
        let mut chain = Vec::new();
        let mut cursor = self.nodes.get(&id).map(|n| n.id());
        while let Some(current) = cursor {
            if let Some(node) = self.nodes.get(&current) {
                chain.push(node.clone());
            }
            cursor = self.parent_of.get(&current).copied();
        }
        chain.reverse();
        chain
    }

    pub fn master(&self) -> &Arc<MasterSitemap> {
        &self.master
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }
}

/// Clonable handle that marks a user sitemap for rebuild from any thread
#[derive(Debug, Clone)]
pub struct RebuildTrigger {
    dirty: Arc<AtomicBool>,
}

impl RebuildTrigger {
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }
}

/// Lazily rebuilt per-session sitemap
pub struct UserSitemap {
    publisher: Arc<SitemapPublisher>,
    subject: Arc<dyn SubjectState>,
    translator: Arc<dyn Translate>,
    collator: Arc<dyn Collator>,
    locale: RwLock<Locale>,
    dirty: Arc<AtomicBool>,
    tree: RwLock<Option<UserTree>>,
    rebuilds: AtomicUsize,
}

impl UserSitemap {
    pub fn new(
        publisher: Arc<SitemapPublisher>,
        subject: Arc<dyn SubjectState>,
        translator: Arc<dyn Translate>,
        collator: Arc<dyn Collator>,
        locale: Locale,
    ) -> Self {
        Self {
            publisher,
            subject,
            translator,
            collator,
            locale: RwLock::new(locale),
            dirty: Arc::new(AtomicBool::new(true)),
            tree: RwLock::new(None),
            rebuilds: AtomicUsize::new(0),
        }
    }

    pub fn trigger(&self) -> RebuildTrigger {
        RebuildTrigger {
            dirty: self.dirty.clone(),
        }
    }

    /// The subject logged in or out; visibility must be re-evaluated
    pub fn structure_changed(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Switch the session locale; labels are recomputed on next read
    pub fn set_locale(&self, locale: Locale) {
        *self.locale.write() = locale;
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn locale(&self) -> Locale {
        self.locale.read().clone()
    }

    pub fn subject(&self) -> &Arc<dyn SubjectState> {
        &self.subject
    }

    /// Number of rebuilds so far
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds.load(Ordering::SeqCst)
    }

    /// Whether a built projection exists
    pub fn is_loaded(&self) -> bool {
        self.tree.read().is_some()
    }

    /// Rebuild now if dirty or if a newer master sitemap was published
    pub fn ensure_current(&self) -> SitemapResult<()> {
        let (master, generation) = self.publisher.snapshot()?;
        let stale = self
            .tree
            .read()
            .as_ref()
            .map(|t| t.generation != generation)
            .unwrap_or(true);
        let dirty = self.dirty.swap(false, Ordering::SeqCst);
        if !(stale || dirty) {
            return Ok(());
        }

        let locale = self.locale();
        let tree = UserTree::build(
            master,
            generation,
            self.subject.as_ref(),
            self.translator.as_ref(),
            self.collator.as_ref(),
            locale,
        );
        debug!(
            nodes = tree.node_count(),
            generation,
            locale = %tree.locale,
            "Rebuilt user sitemap"
        );
        *self.tree.write() = Some(tree);
        self.rebuilds.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Run `f` against an up-to-date projection
    pub fn with_tree<R>(&self, f: impl FnOnce(&UserTree) -> R) -> SitemapResult<R> {
        self.ensure_current()?;
        self.tree.read().as_ref().map(f).ok_or(SitemapError::NotBuilt)
    }

    pub fn node_count(&self) -> SitemapResult<usize> {
        self.with_tree(|t| t.node_count())
    }

    pub fn node_for_uri(&self, uri: &str) -> SitemapResult<Option<UserNode>> {
        self.with_tree(|t| t.node_for_uri(uri).cloned())
    }

    /// Children of `node` in master insertion order; callers apply a sort
    pub fn children(&self, node: &UserNode) -> SitemapResult<Vec<UserNode>> {
        self.with_tree(|t| t.children(node.id()))
    }

    pub fn sorted_children(&self, node: &UserNode, mode: SortMode) -> SitemapResult<Vec<UserNode>> {
        Ok(sort(&self.children(node)?, mode))
    }

    pub fn roots(&self) -> SitemapResult<Vec<UserNode>> {
        self.with_tree(|t| t.roots())
    }

    pub fn sorted_roots(&self, mode: SortMode) -> SitemapResult<Vec<UserNode>> {
        Ok(sort(&self.roots()?, mode))
    }

    pub fn node_chain_for(&self, node: &UserNode) -> SitemapResult<Vec<UserNode>> {
        self.with_tree(|t| t.node_chain_for(node.id()))
    }

    /// Whether `state` addresses the login page
    pub fn is_login_uri(&self, state: &NavigationState) -> SitemapResult<bool> {
        self.with_tree(|t| {
            t.master()
                .standard_page_uri(StandardPageKey::Login)
                .map(|uri| uri == state.virtual_page())
                .unwrap_or(false)
        })
    }

    /// The standard page's node, if the subject can see it
    pub fn standard_page_node(&self, key: StandardPageKey) -> SitemapResult<Option<UserNode>> {
        self.with_tree(|t| {
            t.master()
                .standard_page_uri(key)
                .and_then(|uri| t.node_for_uri(uri).cloned())
        })
    }

    /// Node for `uri` labelled for this session, even when the subject may not see it.
    ///
    /// Used for pages shown to subjects outside the projection, such as a guest-only
    /// login page offered to a remembered subject.
    pub fn labelled_node(&self, uri: &str) -> SitemapResult<Option<UserNode>> {
        if let Some(node) = self.node_for_uri(uri)? {
            return Ok(Some(node));
        }
        let master = self.master()?;
        let locale = self.locale();
        Ok(master.node_for_uri(uri).map(|node| {
            let label = self.translator.label_for(&node.label, &locale);
            let key = self.collator.collation_key(&label, &locale);
            UserNode::new(node.clone(), label, key)
        }))
    }

    /// The standard page's URI, whether or not the subject can see it
    pub fn standard_page_uri(&self, key: StandardPageKey) -> SitemapResult<Option<String>> {
        self.with_tree(|t| t.master().standard_page_uri(key).map(str::to_string))
    }

    /// Final redirect target for `uri`, if it is redirected
    pub fn redirect_target(&self, uri: &str) -> SitemapResult<Option<String>> {
        self.with_tree(|t| t.master().redirect_target(uri))
    }

    /// The master sitemap this projection was built from
    pub fn master(&self) -> SitemapResult<Arc<MasterSitemap>> {
        self.with_tree(|t| t.master().clone())
    }
}
