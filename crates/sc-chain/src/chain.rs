//! The `SupplyChain`: immutable topology plus mutable node state.
//!
//! # Data layout
//!
//! Nodes live in a dense `Vec<Node>` indexed by [`NodeId`]; SKU strings are
//! resolved once at the boundary through a side index.  BOM adjacency is
//! stored twice, as `(neighbor, multiplicity)` lists per node:
//!
//! - `parents[n]`: arcs *into* `n`, the components consumed to build it;
//! - `children[n]`: arcs *out of* `n`, the nodes it supplies.
//!
//! Low-level codes and the two phase orderings derived from them (ascending
//! for releases, descending for ordering) are computed at build time and
//! never change.

use std::collections::HashMap;

use sc_core::{NodeId, Qty};

use crate::node::Node;

/// The supply-chain graph: node table, BOM adjacency, and LLC orderings.
///
/// Construct via [`ChainBuilder`][crate::ChainBuilder] or the JSON loader.
pub struct SupplyChain {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<String, NodeId>,
    pub(crate) parents: Vec<Vec<(NodeId, i64)>>,
    pub(crate) children: Vec<Vec<(NodeId, i64)>>,
    /// Node ids in ascending (llc, insertion) order: suppliers first.
    pub(crate) release_order: Vec<NodeId>,
    /// Node ids in descending llc order, insertion tie-break: children first.
    pub(crate) order_pass: Vec<NodeId>,
    pub(crate) max_llc: u32,
}

impl std::fmt::Debug for SupplyChain {
    /// Trait objects on [`Node`] (`sales`, `lead_time`) aren't `Debug`, so
    /// this summarizes rather than deriving; only needed to satisfy
    /// `Result::unwrap_err` bounds in tests.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupplyChain")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl SupplyChain {
    // ── Dimensions and lookup ─────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Resolve a SKU code to its node id.
    pub fn id_of(&self, sku: &str) -> Option<NodeId> {
        self.index.get(sku).copied()
    }

    /// SKU code of a node.
    #[inline]
    pub fn sku_of(&self, id: NodeId) -> &str {
        self.nodes[id.index()].sku()
    }

    /// Convenience lookup by SKU code.
    pub fn by_sku(&self, sku: &str) -> Option<&Node> {
        self.id_of(sku).map(|id| self.node(id))
    }

    pub fn by_sku_mut(&mut self, sku: &str) -> Option<&mut Node> {
        self.id_of(sku).map(|id| self.node_mut(id))
    }

    // ── Topology ──────────────────────────────────────────────────────────

    /// `(parent, multiplicity)` arcs into `node`: its bill of materials.
    #[inline]
    pub fn parents(&self, node: NodeId) -> &[(NodeId, i64)] {
        &self.parents[node.index()]
    }

    /// `(child, multiplicity)` arcs out of `node`: who it supplies.
    #[inline]
    pub fn children(&self, node: NodeId) -> &[(NodeId, i64)] {
        &self.children[node.index()]
    }

    /// Deepest low-level code in the chain.
    pub fn max_llc(&self) -> u32 {
        self.max_llc
    }

    /// Node ids in ascending (llc, insertion) order.  The release phase walks
    /// this sequence so suppliers ship before their consumers are considered.
    pub fn release_sequence(&self) -> &[NodeId] {
        &self.release_order
    }

    /// Node ids in descending llc order with insertion tie-break.  The order
    /// phase walks this sequence so a child's fresh order is on its
    /// supplier's book within the same pass.
    pub fn order_sequence(&self) -> &[NodeId] {
        &self.order_pass
    }

    // ── Inventory position and feasibility ────────────────────────────────

    /// The signed inventory position of `node`, per SKU.
    ///
    /// Counts, for the node's own SKU: on-hand stock minus backorders minus
    /// the total it still owes downstream.  For each component SKU: units
    /// held here plus units the parent has promised (its order-book entry
    /// for this node).  All in-transit pipeline receipts count under their
    /// own SKU.
    pub fn inventory_position(&self, node: NodeId) -> Qty {
        let state = &self.nodes[node.index()];
        let mut inv = state.pipeline.sum_by_sku();
        for &(parent, _) in &self.parents[node.index()] {
            let promised = self.nodes[parent.index()].orders.get(node);
            inv.add(parent, promised + state.stock.get(parent));
        }
        inv.add(
            node,
            state.stock.get(node) - state.backorders - state.orders.sum(),
        );
        inv
    }

    /// Number of assemblies of `node` buildable from the given position.
    ///
    /// The scarcest component bounds the count; nodes without parents cannot
    /// assemble and return 0.  Never negative.
    pub fn assemblies_feasible_from(&self, node: NodeId, inv: &Qty) -> i64 {
        let bom = &self.parents[node.index()];
        if bom.is_empty() {
            return 0;
        }
        bom.iter()
            .map(|&(parent, number)| inv.get(parent) / number)
            .min()
            .unwrap_or(0)
            .max(0)
    }

    /// Assemblies feasible from the current inventory position, plus the
    /// position of the node's own SKU.  This is the quantity control
    /// strategies compare against their reorder levels; it may be negative
    /// when backorders dominate.
    pub fn inventory_assemblies_feasible(&self, node: NodeId) -> i64 {
        let inv = self.inventory_position(node);
        self.assemblies_feasible_from(node, &inv) + inv.get(node)
    }

    /// Run the assemble step for `node`: convert component stock into
    /// finished units per the BOM.  Returns the number of units built.
    pub fn assemble(&mut self, node: NodeId) -> i64 {
        let bom = &self.parents[node.index()];
        self.nodes[node.index()].assemble(bom)
    }
}
