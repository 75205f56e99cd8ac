//! A single stocking node and its per-period operations.
//!
//! A node holds on-hand stock keyed by SKU (its own plus any component SKUs
//! it stores), a cumulative backorder count, the order book of downstream
//! children, and a pipeline of inbound receipts.  Demand and lead times come
//! from pluggable providers.
//!
//! The operations here are the per-node halves of the simulation phases;
//! each returns what happened so the simulator can emit metric events without
//! the node knowing about any sink.

use std::fmt;

use serde::Deserialize;

use sc_core::{
    CoreResult, LeadTimeProvider, NodeId, Period, Pipeline, Qty, Receipt, SalesProvider,
};

// ── Policy parameters ─────────────────────────────────────────────────────────

/// Per-node control-policy parameters.
///
/// Control strategies read the fields they recognize: RSQ uses
/// `review_time` / `reorder_level` / `order_quantity`, the order-up-to
/// policies use `review_time` / `order_up_to_level`.  `safety_stock` is
/// accepted for forward compatibility but unused by the bundled strategies.
///
/// A node without parameters (`Node::policy == None`) never places orders.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyParams {
    /// Review interval in periods; orders are only considered when
    /// `period % review_time == 0`.  Must be at least 1.
    pub review_time: u32,
    pub reorder_level: i64,
    pub order_quantity: i64,
    pub order_up_to_level: i64,
    pub safety_stock: i64,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            review_time: 1,
            reorder_level: 0,
            order_quantity: 0,
            order_up_to_level: 0,
            safety_stock: 0,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// The outcome of serving one demand order line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleLine {
    pub served: i64,
    pub backordered: i64,
}

/// Mutable state cell for one SKU location.
///
/// Constructed by [`ChainBuilder`][crate::ChainBuilder]; fields are public
/// for direct access from the simulation loop.
pub struct Node {
    /// Dense index of this node in its chain.
    pub id: NodeId,
    sku: String,
    /// Low-level code: longest path from any root, assigned at build time.
    pub llc: u32,
    /// On-hand inventory keyed by SKU (own SKU plus stored components).
    pub stock: Qty,
    /// Unmet demand carried across periods.
    pub backorders: i64,
    /// Outstanding orders placed by downstream children, keyed by child.
    pub orders: Qty,
    /// Inbound in-transit receipts.
    pub pipeline: Pipeline,
    pub sales: Box<dyn SalesProvider>,
    pub lead_time: Box<dyn LeadTimeProvider>,
    pub policy: Option<PolicyParams>,
}

impl Node {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: NodeId,
        sku: String,
        llc: u32,
        stock: Qty,
        backorders: i64,
        orders: Qty,
        pipeline: Pipeline,
        sales: Box<dyn SalesProvider>,
        lead_time: Box<dyn LeadTimeProvider>,
        policy: Option<PolicyParams>,
    ) -> Self {
        Self { id, sku, llc, stock, backorders, orders, pipeline, sales, lead_time, policy }
    }

    /// This node's SKU code.
    #[inline]
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// On-hand units of this node's own SKU.
    #[inline]
    pub fn stock_of_self(&self) -> i64 {
        self.stock.get(self.id)
    }

    /// Collect matured receipts from the pipeline into stock.
    ///
    /// Receipts are credited under their own SKU, which for assembly nodes is
    /// usually a component SKU.  Returns the collected receipts.
    pub fn accept_receipts(&mut self) -> Vec<Receipt> {
        let matured = self.pipeline.pop_matured();
        for receipt in &matured {
            self.stock.add(receipt.sku, receipt.quantity);
        }
        matured
    }

    /// Convert component stock into finished units of this node's SKU.
    ///
    /// `bom` is the list of `(parent, multiplicity)` arcs into this node.
    /// Builds as many units as the scarcest component allows and returns the
    /// count.  Nodes without parents build nothing.
    pub fn assemble(&mut self, bom: &[(NodeId, i64)]) -> i64 {
        let feasible = bom
            .iter()
            .map(|&(parent, number)| self.stock.get(parent) / number)
            .min()
            .unwrap_or(0)
            .max(0);
        if feasible > 0 {
            for &(parent, number) in bom {
                self.stock.add(parent, -(feasible * number));
            }
            self.stock.add(self.id, feasible);
        }
        feasible
    }

    /// Serve as many outstanding backorders as own-SKU stock allows.
    ///
    /// Returns the number of units served.
    pub fn satisfy_backorders(&mut self) -> i64 {
        let served = self.backorders.min(self.stock_of_self()).max(0);
        if served > 0 {
            self.backorders -= served;
            self.stock.add(self.id, -served);
        }
        served
    }

    /// Pop this period's demand and serve it from own-SKU stock.
    ///
    /// Each order line is served up to the remaining stock; the shortfall is
    /// added to `backorders`.  Returns one [`SaleLine`] per demand line, in
    /// demand order.
    pub fn satisfy_sales(&mut self, period: Period) -> CoreResult<Vec<SaleLine>> {
        let lines = self.sales.pop(period)?;
        let mut outcome = Vec::with_capacity(lines.len());
        for quantity in lines {
            let quantity = quantity.max(0);
            let served = quantity.min(self.stock_of_self());
            self.stock.add(self.id, -served);
            let backordered = quantity - served;
            self.backorders += backordered;
            outcome.push(SaleLine { served, backordered });
        }
        Ok(outcome)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("sku", &self.sku)
            .field("llc", &self.llc)
            .field("stock", &self.stock)
            .field("backorders", &self.backorders)
            .field("orders", &self.orders)
            .field("pipeline", &self.pipeline)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
