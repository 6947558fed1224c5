//! Sort orders for sibling lists
//!
//! Every order has an ascending form, a stable sort with ties left in input
//! order, and a descending form defined as the exact reverse of ascending.

use crate::i18n::CollationKey;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What nodes are ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// Collation key of the display label
    Alphabetic,
    /// Order the nodes were added to the master sitemap
    Insertion,
    /// Declared position index
    Position,
    /// Keep the input order
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort type paired with a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortMode {
    pub sort_type: SortType,
    pub direction: SortDirection,
}

impl SortMode {
    pub const fn new(sort_type: SortType, direction: SortDirection) -> Self {
        Self {
            sort_type,
            direction,
        }
    }

    pub const fn ascending(sort_type: SortType) -> Self {
        Self::new(sort_type, SortDirection::Ascending)
    }

    pub const fn descending(sort_type: SortType) -> Self {
        Self::new(sort_type, SortDirection::Descending)
    }

    /// Pass-through; used where parent-chain order must survive
    pub const NONE: SortMode = SortMode::ascending(SortType::None);

    /// All eight modes
    pub fn all() -> Vec<SortMode> {
        let mut modes = Vec::new();
        for sort_type in [
            SortType::Alphabetic,
            SortType::Insertion,
            SortType::Position,
            SortType::None,
        ] {
            modes.push(SortMode::ascending(sort_type));
            modes.push(SortMode::descending(sort_type));
        }
        modes
    }
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::ascending(SortType::Position)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sort_type = match self.sort_type {
            SortType::Alphabetic => "alphabetic",
            SortType::Insertion => "insertion",
            SortType::Position => "position",
            SortType::None => "none",
        };
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}:{}", sort_type, direction)
    }
}

impl FromStr for SortMode {
    type Err = String;

    /// Parse `position`, `alphabetic:desc`, `insertion:asc`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sort_type, direction) = match s.split_once(':') {
            Some((t, d)) => (t, d),
            None => (s, "asc"),
        };
        let sort_type = match sort_type.trim().to_ascii_lowercase().as_str() {
            "alphabetic" | "alpha" => SortType::Alphabetic,
            "insertion" => SortType::Insertion,
            "position" => SortType::Position,
            "none" => SortType::None,
            other => return Err(format!("Unknown sort type: {}", other)),
        };
        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => SortDirection::Ascending,
            "desc" | "descending" => SortDirection::Descending,
            other => return Err(format!("Unknown sort direction: {}", other)),
        };
        Ok(SortMode::new(sort_type, direction))
    }
}

/// Anything the comparators can order
pub trait Sortable {
    fn sort_id(&self) -> NodeId;
    fn position_index(&self) -> i32;
    fn collation_key(&self) -> &CollationKey;
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn sort_id(&self) -> NodeId {
        (**self).sort_id()
    }

    fn position_index(&self) -> i32 {
        (**self).position_index()
    }

    fn collation_key(&self) -> &CollationKey {
        (**self).collation_key()
    }
}

/// Return `nodes` ordered by `mode`; the input is left untouched
pub fn sort<T: Sortable + Clone>(nodes: &[T], mode: SortMode) -> Vec<T> {
    let mut sorted = nodes.to_vec();
    match mode.sort_type {
        SortType::Alphabetic => sorted.sort_by(|a, b| a.collation_key().cmp(b.collation_key())),
        SortType::Insertion => sorted.sort_by_key(|n| n.sort_id()),
        SortType::Position => sorted.sort_by_key(|n| n.position_index()),
        SortType::None => {}
    }
    if mode.direction == SortDirection::Descending {
        sorted.reverse();
    }
    sorted
}
