//! Session-scoped view of a master node

use crate::i18n::CollationKey;
use crate::sort::Sortable;
use crate::tree::{AccessPolicy, MasterNode};
use crate::types::{NodeId, ViewType};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A master node as one session sees it: with a display label for the session
/// locale and the matching collation key.
///
/// Equality and hashing use the master node identity only.
#[derive(Debug, Clone)]
pub struct UserNode {
    master: Arc<MasterNode>,
    label: String,
    collation_key: CollationKey,
}

impl UserNode {
    pub fn new(master: Arc<MasterNode>, label: String, collation_key: CollationKey) -> Self {
        Self {
            master,
            label,
            collation_key,
        }
    }

    pub fn id(&self) -> NodeId {
        self.master.id
    }

    pub fn uri(&self) -> &str {
        &self.master.uri
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.master.policy
    }

    pub fn view(&self) -> Option<&ViewType> {
        self.master.view.as_ref()
    }

    pub fn master(&self) -> &Arc<MasterNode> {
        &self.master
    }
}

impl PartialEq for UserNode {
    fn eq(&self, other: &Self) -> bool {
        self.master.id == other.master.id
    }
}

impl Eq for UserNode {}

impl Hash for UserNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.master.id.hash(state);
    }
}

impl Sortable for UserNode {
    fn sort_id(&self) -> NodeId {
        self.master.id
    }

    fn position_index(&self) -> i32 {
        self.master.position_index
    }

    fn collation_key(&self) -> &CollationKey {
        &self.collation_key
    }
}
