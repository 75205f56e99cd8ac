//! Strongly typed, zero-cost node identifier.
//!
//! Every node (one SKU at one location) gets a dense `NodeId` when its chain
//! is built.  SKU strings exist only at the API boundary; all internal maps
//! and adjacency lists are keyed by `NodeId` so lookups are integer compares
//! and iteration order is the chain's insertion order.

use std::fmt;

/// Index of a node in its chain's node table.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel meaning "no valid node" — equivalent to `u32::MAX`.
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeId {
    /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<NodeId> for usize {
    #[inline(always)]
    fn from(id: NodeId) -> usize {
        id.0 as usize
    }
}
