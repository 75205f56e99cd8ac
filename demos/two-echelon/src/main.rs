//! two-echelon — smallest end-to-end run of the supply-chain simulator.
//!
//! A distributor replenishes from an outside source and feeds two retailers
//! with different demand patterns.  Metric records go to a JSONL file, node
//! state snapshots to a second one, and a summary is printed at the end.

use std::path::Path;

use anyhow::Result;

use sc_chain::{ChainBuilder, NodeSpec, PolicyParams};
use sc_core::{LeadTimeSchedule, SalesSchedule};
use sc_metrics::{EventKind, JsonlWriter, MemorySink, SnapshotWriter, Tee};
use sc_sim::Simulator;
use sc_strategy::{Fractional, Rsq};

// ── Constants ─────────────────────────────────────────────────────────────────

const PERIODS: u32 = 52;
const OUTPUT_DIR: &str = "output/two-echelon";

// Weekly demand cycles for the two retailers.
const SHOP_EAST_CYCLE: [i64; 4] = [6, 9, 4, 7];
const SHOP_WEST_CYCLE: [i64; 4] = [3, 3, 12, 2];

fn cyclic_demand(cycle: &[i64], periods: u32) -> SalesSchedule {
    SalesSchedule::from_lines(
        (0..periods as usize).map(|i| vec![cycle[i % cycle.len()]]),
    )
}

fn rsq(review_time: u32, reorder_level: i64, order_quantity: i64) -> PolicyParams {
    PolicyParams {
        review_time,
        reorder_level,
        order_quantity,
        ..PolicyParams::default()
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== two-echelon supply-chain demo ===");
    println!("Periods: {PERIODS}  |  Output: {OUTPUT_DIR}/");
    println!();

    // 1. Build the chain: depot supplies two shops.
    let chain = ChainBuilder::new()
        .node(
            NodeSpec::new("depot")
                .stock("depot", 80)
                .lead_time(LeadTimeSchedule::fixed(3))
                .policy(rsq(2, 60, 40)),
        )
        .node(
            NodeSpec::new("shop-east")
                .stock("shop-east", 20)
                .sales(cyclic_demand(&SHOP_EAST_CYCLE, PERIODS))
                .lead_time(LeadTimeSchedule::fixed(1))
                .policy(rsq(1, 15, 10)),
        )
        .node(
            NodeSpec::new("shop-west")
                .stock("shop-west", 20)
                .sales(cyclic_demand(&SHOP_WEST_CYCLE, PERIODS))
                .lead_time(LeadTimeSchedule::fixed(1))
                .policy(rsq(1, 15, 10)),
        )
        .edge("depot", "shop-east", 1)
        .edge("depot", "shop-west", 1)
        .build()?;

    // 2. Set up output: metric stream + per-period snapshots + in-memory
    //    copy for the summary below.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let metrics = JsonlWriter::create(Path::new(&format!("{OUTPUT_DIR}/metrics.jsonl")))?;
    let snapshots = SnapshotWriter::create(Path::new(&format!("{OUTPUT_DIR}/snapshots.jsonl")))?;
    let mut sink = Tee(MemorySink::new(), Tee(metrics, snapshots));

    // 3. Run.
    let mut sim = Simulator::new(chain, Rsq, Fractional);
    sim.run(PERIODS, &mut sink)?;

    // 4. Summary: service level per shop and event totals.
    let records = &sink.0;
    println!("{:<12} {:>10}", "Event", "Total");
    println!("{}", "-".repeat(23));
    for kind in [
        EventKind::SalesSatisfied,
        EventKind::SalesBackordered,
        EventKind::Receipt,
        EventKind::Release,
        EventKind::Order,
    ] {
        let total: i64 = records.of_kind(kind).iter().map(|r| r.quantity).sum();
        println!("{:<12} {:>10}", kind.as_str(), total);
    }
    println!();

    println!("{:<12} {:>8} {:>12} {:>12}", "Node", "Stock", "Backorders", "FillRate");
    println!("{}", "-".repeat(48));
    for sku in ["depot", "shop-east", "shop-west"] {
        let node = sim.chain().by_sku(sku).expect("node exists");
        let satisfied: i64 = records
            .for_node(sku)
            .iter()
            .filter(|r| r.event == EventKind::SalesSatisfied)
            .map(|r| r.quantity)
            .sum();
        let backordered: i64 = records
            .for_node(sku)
            .iter()
            .filter(|r| r.event == EventKind::SalesBackordered)
            .map(|r| r.quantity)
            .sum();
        let demand = satisfied + backordered;
        let fill_rate = if demand > 0 {
            format!("{:.1}%", 100.0 * satisfied as f64 / demand as f64)
        } else {
            "-".to_owned()
        };
        println!(
            "{:<12} {:>8} {:>12} {:>12}",
            sku,
            node.stock_of_self(),
            node.backorders,
            fill_rate
        );
    }
    println!();
    println!("Wrote {OUTPUT_DIR}/metrics.jsonl and {OUTPUT_DIR}/snapshots.jsonl");

    Ok(())
}
