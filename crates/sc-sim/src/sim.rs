//! The `Simulator` struct and its period loop.

use tracing::{debug, info};

use sc_chain::SupplyChain;
use sc_core::{LeadTimeProvider, NodeId, Period, Qty, Receipt};
use sc_metrics::{EventKind, MetricRecord, MetricSink};
use sc_strategy::{ControlStrategy, ReleaseStrategy};

use crate::{SimError, SimResult};

/// The supply-chain simulator.
///
/// Owns the chain and drives the seven-phase period loop documented at the
/// [crate root](crate).  Strategies are type parameters so the common case
/// (one concrete policy pair per run) is static-dispatched; heterogeneous
/// setups can pass boxed trait objects.
pub struct Simulator<C: ControlStrategy, R: ReleaseStrategy> {
    chain: SupplyChain,
    control: C,
    release: R,
    /// Highest period simulated so far (0 before the first period).  Sales
    /// are consumed destructively, so periods must advance strictly.
    last_period: u32,
}

impl<C: ControlStrategy, R: ReleaseStrategy> Simulator<C, R> {
    pub fn new(chain: SupplyChain, control: C, release: R) -> Self {
        Self {
            chain,
            control,
            release,
            last_period: 0,
        }
    }

    /// Read access to the chain, e.g. for inspecting state after a run.
    pub fn chain(&self) -> &SupplyChain {
        &self.chain
    }

    /// Unwrap the chain (the sales providers inside have been consumed).
    pub fn into_chain(self) -> SupplyChain {
        self.chain
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run periods `1..=periods`, emitting metric records to `sink`.
    ///
    /// The sink is `finish`ed on every exit path.  The first error (provider,
    /// strategy, state, or sink) aborts the run.
    pub fn run<S: MetricSink>(&mut self, periods: u32, sink: &mut S) -> SimResult<()> {
        self.run_range(1, periods, sink)
    }

    /// Run periods `start..=end` inclusive (both 1-based).
    ///
    /// Ranges across calls must be strictly increasing: a period at or
    /// before one already simulated is rejected with
    /// [`SimError::ReplayedPeriod`], because its demand was already popped
    /// and replaying it would silently simulate against empty sales.
    pub fn run_range<S: MetricSink>(
        &mut self,
        start: u32,
        end: u32,
        sink: &mut S,
    ) -> SimResult<()> {
        info!(start, end, nodes = self.chain.len(), "simulation run started");
        let mut result = Ok(());
        for period in start..=end {
            result = self.simulate_period(Period(period), sink);
            if result.is_err() {
                break;
            }
        }
        let closed = sink.finish().map_err(SimError::from);
        if result.is_ok() {
            info!(start, end, "simulation run finished");
        }
        result.and(closed)
    }

    /// Simulate a single period.
    ///
    /// Periods must advance strictly across calls (see
    /// [`run_range`](Self::run_range)).  A period that errors still counts
    /// as consumed: its sales may already have been popped.
    pub fn simulate_period<S: MetricSink>(
        &mut self,
        period: Period,
        sink: &mut S,
    ) -> SimResult<()> {
        if period.0 <= self.last_period {
            return Err(SimError::ReplayedPeriod {
                period: period.0,
                last: self.last_period,
            });
        }
        self.last_period = period.0;

        let all: Vec<NodeId> = self.chain.node_ids().collect();

        // ── ① Receive ─────────────────────────────────────────────────────
        for &id in &all {
            let matured = self.chain.node_mut(id).accept_receipts();
            for receipt in matured {
                self.emit(sink, period, id, EventKind::Receipt, receipt.quantity, Some(receipt.sku))?;
            }
        }
        self.check_invariants("receive")?;

        // ── ② Assemble ────────────────────────────────────────────────────
        for &id in &all {
            self.chain.assemble(id);
        }

        // ── ③ Backorders ──────────────────────────────────────────────────
        for &id in &all {
            let served = self.chain.node_mut(id).satisfy_backorders();
            if served > 0 {
                self.emit(sink, period, id, EventKind::SalesSatisfied, served, None)?;
            }
        }

        // ── ④ Demand ──────────────────────────────────────────────────────
        for &id in &all {
            let outcome = self.chain.node_mut(id).satisfy_sales(period)?;
            for line in outcome {
                if line.served > 0 {
                    self.emit(sink, period, id, EventKind::SalesSatisfied, line.served, None)?;
                }
                if line.backordered > 0 {
                    self.emit(sink, period, id, EventKind::SalesBackordered, line.backordered, None)?;
                }
            }
        }
        self.check_invariants("demand")?;

        // ── ⑤ Release (ascending LLC: suppliers ship first) ───────────────
        //
        // Compute and apply per node, in sequence: each supplier's allocation
        // is based on its own pre-release stock, and a shipment entering a
        // child's pipeline this period cannot be consumed until it matures.
        let release_sequence = self.chain.release_sequence().to_vec();
        for id in release_sequence {
            let releases = self.release.get_releases(&self.chain, id)?;
            self.apply_releases(id, &releases, period, sink)?;
        }
        self.check_invariants("release")?;

        // ── ⑥ Order (descending LLC: children first) ──────────────────────
        //
        // A child's order lands on its supplier's book here, so the supplier
        // sees it in the next period's release phase.
        let order_sequence = self.chain.order_sequence().to_vec();
        for id in order_sequence {
            let orders = self.control.get_orders(&self.chain, id, period)?;
            self.apply_orders(id, &orders, period, sink)?;
        }
        self.check_invariants("order")?;

        // ── ⑦ Age ─────────────────────────────────────────────────────────
        for &id in &all {
            self.chain.node_mut(id).pipeline.age();
        }

        sink.period_end(period, &self.chain)?;
        debug!(%period, "period complete");
        Ok(())
    }

    // ── Release / order application ───────────────────────────────────────

    /// Ship `releases` from `node` into the pipelines of its children.
    ///
    /// Every released unit leaves `node`'s own-SKU stock and reduces the
    /// child's entry in the order book; what remains on the book is the
    /// supplier-side backorder, retried next period.  The shipment arrives
    /// with the *child's* lead time.
    fn apply_releases<S: MetricSink>(
        &mut self,
        node: NodeId,
        releases: &Qty,
        period: Period,
        sink: &mut S,
    ) -> SimResult<()> {
        for (child, quantity) in releases.iter() {
            if quantity <= 0 {
                continue;
            }
            let state = self.chain.node(node);
            let on_hand = state.stock_of_self();
            if quantity > on_hand {
                return Err(SimError::ReleaseExceedsStock {
                    node: self.chain.sku_of(node).to_owned(),
                    on_hand,
                    requested: quantity,
                });
            }
            let owed = state.orders.get(child);
            if quantity > owed {
                return Err(SimError::ReleaseExceedsOrder {
                    node: self.chain.sku_of(node).to_owned(),
                    child: self.chain.sku_of(child).to_owned(),
                    owed,
                    requested: quantity,
                });
            }

            let eta = self.chain.node(child).lead_time.get(period)?;
            {
                let supplier = self.chain.node_mut(node);
                supplier.stock.add(node, -quantity);
                supplier.orders.add(child, -quantity);
            }
            self.chain.node_mut(child).pipeline.add(Receipt {
                sku: node,
                eta,
                quantity,
            });
            self.emit(sink, period, node, EventKind::Release, quantity, Some(node))?;
        }
        Ok(())
    }

    /// Place the orders proposed for `node`.
    ///
    /// An entry keyed by `node` itself is exploded onto its suppliers by BOM
    /// multiplicity; for root nodes (no suppliers) it turns directly into a
    /// receipt on the node's own pipeline with the node's lead time.  Entries
    /// keyed by other nodes are placed on those nodes' books as orders from
    /// `node`.
    fn apply_orders<S: MetricSink>(
        &mut self,
        node: NodeId,
        orders: &Qty,
        period: Period,
        sink: &mut S,
    ) -> SimResult<()> {
        for (target, quantity) in orders.iter() {
            if quantity <= 0 {
                continue;
            }
            if target == node {
                let bom = self.chain.parents(node).to_vec();
                if bom.is_empty() {
                    let eta = self.chain.node(node).lead_time.get(period)?;
                    self.chain.node_mut(node).pipeline.add(Receipt {
                        sku: node,
                        eta,
                        quantity,
                    });
                } else {
                    for (parent, number) in bom {
                        self.chain.node_mut(parent).orders.add(node, quantity * number);
                    }
                }
            } else {
                self.chain.node_mut(target).orders.add(node, quantity);
            }
            self.emit(sink, period, node, EventKind::Order, quantity, None)?;
        }
        Ok(())
    }

    // ── Emission and invariants ───────────────────────────────────────────

    fn emit<S: MetricSink>(
        &self,
        sink: &mut S,
        period: Period,
        node: NodeId,
        event: EventKind,
        quantity: i64,
        sku: Option<NodeId>,
    ) -> SimResult<()> {
        let record = MetricRecord {
            period: period.0,
            node: self.chain.sku_of(node).to_owned(),
            event,
            quantity,
            sku: sku.map(|s| self.chain.sku_of(s).to_owned()),
        };
        sink.record(&record)?;
        Ok(())
    }

    /// Phase-boundary state sweep, active in debug builds.
    ///
    /// The engine is deterministic, so any negative stock, backorder, or
    /// order-book entry is a defect, not a condition to recover from.
    fn check_invariants(&self, phase: &'static str) -> SimResult<()> {
        if !cfg!(debug_assertions) {
            return Ok(());
        }
        for id in self.chain.node_ids() {
            let node = self.chain.node(id);
            for (sku, quantity) in node.stock.iter() {
                if quantity < 0 {
                    return Err(self.violation(id, phase, format!(
                        "stock[{}] = {quantity}",
                        self.chain.sku_of(sku)
                    )));
                }
            }
            if node.backorders < 0 {
                return Err(self.violation(id, phase, format!(
                    "backorders = {}",
                    node.backorders
                )));
            }
            for (child, quantity) in node.orders.iter() {
                if quantity < 0 {
                    return Err(self.violation(id, phase, format!(
                        "orders[{}] = {quantity}",
                        self.chain.sku_of(child)
                    )));
                }
            }
        }
        Ok(())
    }

    fn violation(&self, node: NodeId, phase: &'static str, detail: String) -> SimError {
        SimError::InvariantViolation {
            node: self.chain.sku_of(node).to_owned(),
            phase,
            detail,
        }
    }
}
