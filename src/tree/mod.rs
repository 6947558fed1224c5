//! Page tree model
//!
//! Node records and sitemap nodes, plus a generic depth-first walker used by
//! every component that needs to visit a forest of pages.

pub mod node;
pub mod walker;

pub use node::{AccessPolicy, MasterNode, NodeRecord, PageConfig, StandardPageKey};
pub use walker::{walk, CaptionCollector, Forest, NodeCollector, NodeCounter, TreeVisitor};
