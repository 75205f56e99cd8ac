//! Integration tests for the period loop.

use sc_chain::{ChainBuilder, NodeSpec, PolicyParams, SupplyChain};
use sc_core::{LeadTimeSchedule, NodeId, Period, Qty, SalesSchedule};
use sc_metrics::{EventKind, MemorySink, MetricSink};
use sc_strategy::{Fractional, ReleaseStrategy, Rsq, StrategyResult};

use crate::{SimError, Simulator};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rsq(review_time: u32, reorder_level: i64, order_quantity: i64) -> PolicyParams {
    PolicyParams {
        review_time,
        reorder_level,
        order_quantity,
        ..PolicyParams::default()
    }
}

/// Steady demand of `quantity` per period for `periods` periods.
fn steady_demand(quantity: i64, periods: u32) -> SalesSchedule {
    SalesSchedule::from_lines((0..periods).map(|_| vec![quantity]))
}

fn kinds(sink: &MemorySink, period: u32) -> Vec<(EventKind, i64)> {
    sink.records
        .iter()
        .filter(|r| r.period == period)
        .map(|r| (r.event, r.quantity))
        .collect()
}

// ── Scenario: single node, no BOM ─────────────────────────────────────────────

#[cfg(test)]
mod single_node_tests {
    use super::*;

    fn single_node_sim() -> Simulator<Rsq, Fractional> {
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("A")
                    .sales(steady_demand(3, 4))
                    .lead_time(LeadTimeSchedule::fixed(1))
                    .policy(rsq(1, 5, 10)),
            )
            .build()
            .unwrap();
        Simulator::new(chain, Rsq, Fractional)
    }

    #[test]
    fn four_period_trajectory() {
        let mut sim = single_node_sim();
        let mut sink = MemorySink::new();
        sim.run(4, &mut sink).unwrap();

        // Period 1: no stock, demand backordered, one batch ordered.
        assert_eq!(
            kinds(&sink, 1),
            vec![(EventKind::SalesBackordered, 3), (EventKind::Order, 10)]
        );
        // Period 2: the batch arrives, backorders then fresh demand are
        // served, and the position (4) is still below the reorder level.
        assert_eq!(
            kinds(&sink, 2),
            vec![
                (EventKind::Receipt, 10),
                (EventKind::SalesSatisfied, 3),
                (EventKind::SalesSatisfied, 3),
                (EventKind::Order, 10),
            ]
        );
        // Period 3: second batch arrives; position recovers, no more orders.
        assert_eq!(
            kinds(&sink, 3),
            vec![(EventKind::Receipt, 10), (EventKind::SalesSatisfied, 3)]
        );
        assert_eq!(kinds(&sink, 4), vec![(EventKind::SalesSatisfied, 3)]);

        let a = sim.chain().by_sku("A").unwrap();
        assert_eq!(a.stock_of_self(), 8);
        assert_eq!(a.backorders, 0);
    }

    #[test]
    fn sales_conservation_per_period() {
        let mut sim = single_node_sim();
        let mut sink = MemorySink::new();
        let a = sim.chain().id_of("A").unwrap();

        for period in 1..=4u32 {
            let before = sim.chain().node(a).backorders;
            sim.simulate_period(Period(period), &mut sink).unwrap();
            let delta = sim.chain().node(a).backorders - before;
            let satisfied = sink.total(period, EventKind::SalesSatisfied);
            assert_eq!(satisfied + delta, 3, "period {period}");
        }
    }

    #[test]
    fn root_orders_become_receipts_on_own_pipeline() {
        let mut sim = single_node_sim();
        let mut sink = MemorySink::new();
        sim.simulate_period(Period(1), &mut sink).unwrap();

        let a = sim.chain().by_sku("A").unwrap();
        let in_transit = a.pipeline.sum_by_sku();
        assert_eq!(in_transit.get(a.id), 10);
    }
}

// ── Scenario: two echelons ────────────────────────────────────────────────────

#[cfg(test)]
mod two_echelon_tests {
    use super::*;

    fn two_echelon_sim() -> Simulator<Rsq, Fractional> {
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("R")
                    .stock("R", 100)
                    .lead_time(LeadTimeSchedule::fixed(2)),
            )
            .node(
                NodeSpec::new("L")
                    .stock("L", 5)
                    .sales(steady_demand(2, 4))
                    .lead_time(LeadTimeSchedule::fixed(1))
                    .policy(rsq(1, 10, 10)),
            )
            .edge("R", "L", 1)
            .build()
            .unwrap();
        Simulator::new(chain, Rsq, Fractional)
    }

    #[test]
    fn llc_assignment() {
        let sim = two_echelon_sim();
        assert_eq!(sim.chain().by_sku("R").unwrap().llc, 0);
        assert_eq!(sim.chain().by_sku("L").unwrap().llc, 1);
    }

    #[test]
    fn leaf_order_flows_to_root_and_back() {
        let mut sim = two_echelon_sim();
        let mut sink = MemorySink::new();
        sim.run(4, &mut sink).unwrap();

        // L reviews in period 1 (position 3 after demand) and orders a batch.
        let orders = sink.of_kind(EventKind::Order);
        assert_eq!(orders[0].period, 1);
        assert_eq!(orders[0].node, "L");
        assert_eq!(orders[0].quantity, 10);

        // R sees the order on its book one period later and ships in full.
        let releases = sink.of_kind(EventKind::Release);
        assert_eq!(releases[0].period, 2);
        assert_eq!(releases[0].node, "R");
        assert_eq!(releases[0].quantity, 10);
        assert_eq!(releases[0].sku.as_deref(), Some("R"));

        // The shipment matures at the end of period 2 and is collected in 3.
        let receipts = sink.of_kind(EventKind::Receipt);
        assert_eq!(receipts[0].period, 3);
        assert_eq!(receipts[0].node, "L");
        assert_eq!(receipts[0].sku.as_deref(), Some("R"));
        assert_eq!(receipts[0].quantity, 10);

        // R shipped twice (periods 2 and 4) by the end of the run.
        assert_eq!(sim.chain().by_sku("R").unwrap().stock_of_self(), 80);
        assert_eq!(sim.chain().by_sku("L").unwrap().stock_of_self(), 7);
    }

    #[test]
    fn in_transit_stock_suppresses_reordering() {
        let mut sim = two_echelon_sim();
        let mut sink = MemorySink::new();
        sim.run(2, &mut sink).unwrap();

        // After the period-2 shipment R is down to 90 and L's batch sits in
        // its pipeline, matured and ready for collection.
        assert_eq!(sim.chain().by_sku("R").unwrap().stock_of_self(), 90);
        let r = sim.chain().id_of("R").unwrap();
        let l = sim.chain().by_sku("L").unwrap();
        assert_eq!(l.pipeline.sum_by_sku().get(r), 10);

        // Period 2: 10 units are in transit to L, so its position is above
        // the reorder level and no second order is placed.
        let orders: Vec<u32> = sink
            .of_kind(EventKind::Order)
            .iter()
            .map(|r| r.period)
            .collect();
        assert_eq!(orders, vec![1]);
    }
}

// ── BOM explosion and assembly ────────────────────────────────────────────────

#[cfg(test)]
mod bom_tests {
    use super::*;

    /// Assembly A needs 2 units of C and 1 of D.
    fn assembly_sim(d_stock: i64) -> Simulator<Rsq, Fractional> {
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("A")
                    .lead_time(LeadTimeSchedule::fixed(1))
                    .policy(rsq(1, 10, 10)),
            )
            .node(
                NodeSpec::new("C")
                    .stock("C", 100)
                    .lead_time(LeadTimeSchedule::fixed(1)),
            )
            .node(
                NodeSpec::new("D")
                    .stock("D", d_stock)
                    .lead_time(LeadTimeSchedule::fixed(1)),
            )
            .edge("C", "A", 2)
            .edge("D", "A", 1)
            .build()
            .unwrap();
        Simulator::new(chain, Rsq, Fractional)
    }

    #[test]
    fn order_explodes_onto_suppliers_by_multiplicity() {
        let mut sim = assembly_sim(100);
        let mut sink = MemorySink::new();
        sim.simulate_period(Period(1), &mut sink).unwrap();

        let a = sim.chain().id_of("A").unwrap();
        assert_eq!(sim.chain().by_sku("C").unwrap().orders.get(a), 20);
        assert_eq!(sim.chain().by_sku("D").unwrap().orders.get(a), 10);
    }

    #[test]
    fn components_ship_arrive_and_assemble() {
        let mut sim = assembly_sim(100);
        let mut sink = MemorySink::new();
        sim.run(3, &mut sink).unwrap();

        // Period 1: A orders 10 assemblies (20 C + 10 D).  Period 2: both
        // suppliers ship; receipts mature.  Period 3: components arrive and
        // assembly converts them into 10 finished units.
        let a = sim.chain().by_sku("A").unwrap();
        assert_eq!(a.stock_of_self(), 10);
        let c = sim.chain().id_of("C").unwrap();
        let d = sim.chain().id_of("D").unwrap();
        assert_eq!(a.stock.get(c), 0);
        assert_eq!(a.stock.get(d), 0);
    }

    #[test]
    fn scarce_component_bounds_assembly() {
        // D can only ship 5, so A assembles 5 and sits on surplus C stock.
        let mut sim = assembly_sim(5);
        let mut sink = MemorySink::new();
        sim.run(3, &mut sink).unwrap();

        let a = sim.chain().by_sku("A").unwrap();
        let c = sim.chain().id_of("C").unwrap();
        let d_id = sim.chain().id_of("D").unwrap();
        assert_eq!(a.stock_of_self(), 5);
        assert_eq!(a.stock.get(c), 10);
        assert_eq!(a.stock.get(d_id), 0);

        // The unshipped 5 stay on D's book as a supplier-side backorder.
        let a_id = sim.chain().id_of("A").unwrap();
        assert_eq!(sim.chain().by_sku("D").unwrap().orders.get(a_id), 5);
    }
}

// ── Fractional allocation through the full loop ───────────────────────────────

#[cfg(test)]
mod allocation_tests {
    use super::*;

    #[test]
    fn shortage_split_lands_in_child_pipelines() {
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("S")
                    .stock("S", 9)
                    .order("X", 6)
                    .order("Y", 6),
            )
            .node(NodeSpec::new("X").lead_time(LeadTimeSchedule::fixed(1)))
            .node(NodeSpec::new("Y").lead_time(LeadTimeSchedule::fixed(1)))
            .edge("S", "X", 1)
            .edge("S", "Y", 1)
            .build()
            .unwrap();
        let mut sim = Simulator::new(chain, Rsq, Fractional);
        let mut sink = MemorySink::new();
        sim.simulate_period(Period(1), &mut sink).unwrap();

        // Tentative 5/5 overshoots the 9 on hand; X (first in map order)
        // gives up the unit.
        let s = sim.chain().id_of("S").unwrap();
        let x = sim.chain().by_sku("X").unwrap();
        let y = sim.chain().by_sku("Y").unwrap();
        assert_eq!(x.pipeline.sum_by_sku().get(s), 4);
        assert_eq!(y.pipeline.sum_by_sku().get(s), 5);
        assert_eq!(sim.chain().by_sku("S").unwrap().stock_of_self(), 0);

        // Released units equal the pipeline entries created this period.
        let released: i64 = sink
            .of_kind(EventKind::Release)
            .iter()
            .map(|r| r.quantity)
            .sum();
        assert_eq!(released, 9);

        // The order book keeps the unmet remainder.
        let s_node = sim.chain().by_sku("S").unwrap();
        let x_id = sim.chain().id_of("X").unwrap();
        let y_id = sim.chain().id_of("Y").unwrap();
        assert_eq!(s_node.orders.get(x_id), 2);
        assert_eq!(s_node.orders.get(y_id), 1);
    }
}

// ── Error paths ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod error_tests {
    use super::*;

    /// Releases everything on the book, ignoring stock.
    struct ReleaseEverything;
    impl ReleaseStrategy for ReleaseEverything {
        fn get_releases(&self, chain: &SupplyChain, node: NodeId) -> StrategyResult<Qty> {
            Ok(chain.node(node).orders.clone())
        }
    }

    /// Ships to the first child regardless of the order book.
    struct ReleaseUnordered;
    impl ReleaseStrategy for ReleaseUnordered {
        fn get_releases(&self, chain: &SupplyChain, node: NodeId) -> StrategyResult<Qty> {
            let mut releases = Qty::new();
            if let Some(&(child, _)) = chain.children(node).first() {
                releases.set(child, 1);
            }
            Ok(releases)
        }
    }

    /// Records whether `finish` ran.
    #[derive(Default)]
    struct FinishProbe {
        finished: bool,
    }
    impl MetricSink for FinishProbe {
        fn record(&mut self, _r: &sc_metrics::MetricRecord) -> sc_metrics::MetricsResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> sc_metrics::MetricsResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    /// Fails on the first record.
    struct FailingSink;
    impl MetricSink for FailingSink {
        fn record(&mut self, _r: &sc_metrics::MetricRecord) -> sc_metrics::MetricsResult<()> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    fn short_supplier() -> SupplyChain {
        ChainBuilder::new()
            .node(NodeSpec::new("S").stock("S", 3).order("X", 6))
            .node(NodeSpec::new("X").lead_time(LeadTimeSchedule::fixed(1)))
            .edge("S", "X", 1)
            .build()
            .unwrap()
    }

    #[test]
    fn over_release_is_fatal() {
        let mut sim = Simulator::new(short_supplier(), Rsq, ReleaseEverything);
        let err = sim.run(1, &mut MemorySink::new()).unwrap_err();
        assert!(matches!(err, SimError::ReleaseExceedsStock { .. }), "{err}");
    }

    #[test]
    fn release_without_order_is_fatal() {
        let chain = ChainBuilder::new()
            .node(NodeSpec::new("S").stock("S", 10))
            .node(NodeSpec::new("X").lead_time(LeadTimeSchedule::fixed(1)))
            .edge("S", "X", 1)
            .build()
            .unwrap();
        let mut sim = Simulator::new(chain, Rsq, ReleaseUnordered);
        let err = sim.run(1, &mut MemorySink::new()).unwrap_err();
        assert!(matches!(err, SimError::ReleaseExceedsOrder { .. }), "{err}");
    }

    #[test]
    fn missing_lead_time_aborts_but_finishes_sink() {
        // The node orders in period 1 but its (explicitly supplied) schedule
        // has no entry and no default.
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("A")
                    .lead_time(LeadTimeSchedule::new())
                    .policy(rsq(1, 5, 10)),
            )
            .build()
            .unwrap();
        let mut sim = Simulator::new(chain, Rsq, Fractional);
        let mut sink = FinishProbe::default();

        let err = sim.run(1, &mut sink).unwrap_err();
        assert!(matches!(err, SimError::Core(_)), "{err}");
        assert!(sink.finished, "sink must be closed on the error path");
    }

    #[test]
    fn sink_failure_terminates_run() {
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("A")
                    .sales(steady_demand(3, 1))
                    .lead_time(LeadTimeSchedule::fixed(1)),
            )
            .build()
            .unwrap();
        let mut sim = Simulator::new(chain, Rsq, Fractional);
        let err = sim.run(1, &mut FailingSink).unwrap_err();
        assert!(matches!(err, SimError::Metrics(_)), "{err}");
    }
}

// ── Run windows ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_range_tests {
    use super::*;

    #[test]
    fn only_the_requested_periods_are_simulated() {
        let mut sales = SalesSchedule::new();
        sales.set(1, vec![5]);
        sales.set(2, vec![7]);
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("A")
                    .stock("A", 50)
                    .sales(sales)
                    .lead_time(LeadTimeSchedule::fixed(1)),
            )
            .build()
            .unwrap();
        let mut sim = Simulator::new(chain, Rsq, Fractional);
        let mut sink = MemorySink::new();
        sim.run_range(2, 3, &mut sink).unwrap();

        // Period 1's demand was never popped; only period 2's 7 units moved.
        assert_eq!(sink.total(2, EventKind::SalesSatisfied), 7);
        assert_eq!(sink.total(3, EventKind::SalesSatisfied), 0);
        assert_eq!(sim.chain().by_sku("A").unwrap().stock_of_self(), 43);
    }

    fn stocked_node() -> Simulator<Rsq, Fractional> {
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("A")
                    .stock("A", 50)
                    .sales(steady_demand(1, 10))
                    .lead_time(LeadTimeSchedule::fixed(1)),
            )
            .build()
            .unwrap();
        Simulator::new(chain, Rsq, Fractional)
    }

    #[test]
    fn rerunning_consumed_periods_is_an_error() {
        let mut sim = stocked_node();
        sim.run(3, &mut MemorySink::new()).unwrap();

        let err = sim.run(3, &mut MemorySink::new()).unwrap_err();
        assert!(
            matches!(err, SimError::ReplayedPeriod { period: 1, last: 3 }),
            "{err}"
        );
    }

    #[test]
    fn overlapping_ranges_are_an_error() {
        let mut sim = stocked_node();
        sim.run_range(1, 3, &mut MemorySink::new()).unwrap();

        let err = sim.run_range(3, 5, &mut MemorySink::new()).unwrap_err();
        assert!(matches!(err, SimError::ReplayedPeriod { period: 3, last: 3 }));
    }

    #[test]
    fn sequential_ranges_resume_cleanly() {
        let mut sim = stocked_node();
        let mut sink = MemorySink::new();
        sim.run_range(1, 2, &mut sink).unwrap();
        sim.run_range(3, 5, &mut sink).unwrap();

        // One unit of demand served in each of the five periods.
        assert_eq!(sim.chain().by_sku("A").unwrap().stock_of_self(), 45);
    }

    #[test]
    fn replay_guard_counts_a_failed_period_as_consumed() {
        // Period 1 fails in the order phase, after demand was popped; a
        // retry of the same period must be rejected, not silently rerun.
        let chain = ChainBuilder::new()
            .node(
                NodeSpec::new("A")
                    .sales(steady_demand(3, 2))
                    .lead_time(LeadTimeSchedule::new())
                    .policy(rsq(1, 5, 10)),
            )
            .build()
            .unwrap();
        let mut sim = Simulator::new(chain, Rsq, Fractional);

        let err = sim.run(1, &mut MemorySink::new()).unwrap_err();
        assert!(matches!(err, SimError::Core(_)), "{err}");

        let err = sim.run(1, &mut MemorySink::new()).unwrap_err();
        assert!(matches!(err, SimError::ReplayedPeriod { .. }), "{err}");
    }
}
