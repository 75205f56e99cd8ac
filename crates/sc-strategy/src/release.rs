//! Release strategies: splitting a supplier's stock across open orders.

use sc_chain::SupplyChain;
use sc_core::{NodeId, Qty};

use crate::error::StrategyResult;

/// Decides how many units a node ships to each downstream child this period.
///
/// Contract: `sum(releases) <= stock of the node's own SKU`, and every
/// `releases[child] <= orders[child]`.  The simulator treats violations as
/// fatal state errors.
pub trait ReleaseStrategy {
    fn get_releases(&self, chain: &SupplyChain, node: NodeId) -> StrategyResult<Qty>;
}

/// Proportional shortage allocation.
///
/// Each child's order is cut by its share of the shortage,
/// `ceil(order - shortage * order / order_total)`, then rounded-up totals
/// are walked back by decrementing the largest release one unit at a time
/// until the sum fits the available stock.  Ties go to the first entry in
/// map order (ascending node id).
///
/// When shortage is zero every order is released in full; otherwise the
/// total released equals the available stock exactly.  A negative own-SKU
/// position counts as zero available: nothing is released.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fractional;

impl ReleaseStrategy for Fractional {
    fn get_releases(&self, chain: &SupplyChain, node: NodeId) -> StrategyResult<Qty> {
        let state = chain.node(node);
        let available = state.stock_of_self().max(0);
        let order_total = state.orders.sum();

        let mut releases = Qty::new();
        if order_total == 0 {
            return Ok(releases);
        }

        let shortage = (order_total - available).max(0);
        for (child, order) in state.orders.iter() {
            let cut = shortage as f64 * (order as f64 / order_total as f64);
            releases.set(child, (order as f64 - cut).ceil() as i64);
        }

        // Rounding up can overshoot the stock by a few units; shave the
        // largest release until the total fits.  Each pass drops the sum by
        // one and the sum starts at or above `available`, so this is bounded.
        while releases.sum() > available {
            let largest = releases
                .iter()
                .reduce(|max, entry| if entry.1 > max.1 { entry } else { max })
                .map(|(child, _)| child);
            match largest {
                Some(child) => releases.add(child, -1),
                None => break,
            }
        }

        Ok(releases)
    }
}
