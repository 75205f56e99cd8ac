//! Control strategies: how much to order, and when.

use std::collections::BTreeSet;

use sc_chain::SupplyChain;
use sc_core::{NodeId, Period, Qty};

use crate::error::{StrategyError, StrategyResult};

/// Proposes replenishment orders for one node.
///
/// The returned map is keyed by the node the order is *for*; the bundled
/// strategies return at most one entry, keyed by `node` itself, and the
/// simulator explodes that quantity onto the node's suppliers by BOM
/// multiplicity.  Entries keyed by other nodes are placed as direct orders
/// at those nodes, for custom strategies that need it.
///
/// Implementations must be pure functions of the chain state: calling
/// `get_orders` twice in the same period with unchanged state must return
/// the same quantities.
pub trait ControlStrategy {
    fn get_orders(
        &self,
        chain: &SupplyChain,
        node: NodeId,
        period: Period,
    ) -> StrategyResult<Qty>;
}

// ── RSQ ───────────────────────────────────────────────────────────────────────

/// Periodic-review, reorder-level, batch-size policy.
///
/// At every review moment (`period % review_time == 0`), compare the node's
/// feasible-assembly inventory position `I` against `reorder_level`.  Below
/// the level, order enough whole batches of `order_quantity` to cover the
/// deficit:
///
/// ```text
/// ceil((reorder_level - I) / order_quantity) * order_quantity
/// ```
///
/// Nodes without policy parameters never order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rsq;

impl ControlStrategy for Rsq {
    fn get_orders(
        &self,
        chain: &SupplyChain,
        node: NodeId,
        period: Period,
    ) -> StrategyResult<Qty> {
        let mut orders = Qty::new();
        let Some(policy) = &chain.node(node).policy else {
            return Ok(orders);
        };
        if !period.is_review(policy.review_time) {
            return Ok(orders);
        }

        let position = chain.inventory_assemblies_feasible(node);
        if position >= policy.reorder_level {
            return Ok(orders);
        }

        if policy.order_quantity < 1 {
            return Err(StrategyError::InvalidParameter {
                node: chain.sku_of(node).to_owned(),
                reason: "order_quantity must be at least 1".to_owned(),
            });
        }

        let deficit = policy.reorder_level - position;
        let batches = (deficit + policy.order_quantity - 1) / policy.order_quantity;
        let quantity = batches * policy.order_quantity;
        orders.set(node, quantity);
        Ok(orders)
    }
}

// ── Multi-echelon RS ──────────────────────────────────────────────────────────

/// Multi-echelon order-up-to policy.
///
/// The echelon inventory of a node is the feasible-assembly position summed
/// over the node and everything downstream of it (each node counted once).
/// At review moments the node orders the gap up to `order_up_to_level`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeRs;

impl MeRs {
    /// Sum `inventory_assemblies_feasible` over `node` and all descendants.
    fn echelon_inventory(chain: &SupplyChain, node: NodeId) -> i64 {
        let mut seen = BTreeSet::new();
        let mut frontier = vec![node];
        let mut total = 0;
        while let Some(current) = frontier.pop() {
            if !seen.insert(current) {
                continue;
            }
            total += chain.inventory_assemblies_feasible(current);
            frontier.extend(chain.children(current).iter().map(|&(child, _)| child));
        }
        total
    }
}

impl ControlStrategy for MeRs {
    fn get_orders(
        &self,
        chain: &SupplyChain,
        node: NodeId,
        period: Period,
    ) -> StrategyResult<Qty> {
        let mut orders = Qty::new();
        let Some(policy) = &chain.node(node).policy else {
            return Ok(orders);
        };
        if !period.is_review(policy.review_time) {
            return Ok(orders);
        }

        let echelon = Self::echelon_inventory(chain, node);
        let quantity = (policy.order_up_to_level - echelon).max(0);
        if quantity > 0 {
            orders.set(node, quantity);
        }
        Ok(orders)
    }
}
