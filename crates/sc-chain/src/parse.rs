//! JSON chain loader.
//!
//! # Document format
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "id": "A",
//!       "sales": [[10], [10, 5]],
//!       "lead_time": {"1": 3, "default": 2},
//!       "stock": {"A": 15, "C": 5},
//!       "orders": {"B": 15},
//!       "backorders": 0,
//!       "pipeline": [{"sku": "C", "eta": 1, "quantity": 75}],
//!       "policy": {"review_time": 1, "reorder_level": 25, "order_quantity": 30},
//!       "predecessors": [{"source": "C", "destination": "A", "number": 2}]
//!     }
//!   ],
//!   "edges": [{"source": "D", "destination": "A", "number": 1}]
//! }
//! ```
//!
//! `sales` and `lead_time` accept either a list (element `i` is period
//! `i + 1`) or a map keyed by period number.  The lead-time map additionally
//! accepts a `"default"` key used for any period without an explicit entry.
//! Every field except `id` is optional.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use sc_core::{LeadTimeSchedule, SalesSchedule};

use crate::builder::{ChainBuilder, NodeSpec};
use crate::chain::SupplyChain;
use crate::edge::Edge;
use crate::error::{ChainError, ChainResult};
use crate::node::PolicyParams;

// ── Document shapes ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChainDoc {
    #[serde(default)]
    nodes: Vec<NodeDoc>,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
struct NodeDoc {
    id: String,
    #[serde(default)]
    sales: Option<SalesDoc>,
    #[serde(default)]
    lead_time: Option<LeadTimeDoc>,
    #[serde(default)]
    backorders: i64,
    #[serde(default)]
    stock: BTreeMap<String, i64>,
    #[serde(default)]
    orders: BTreeMap<String, i64>,
    #[serde(default)]
    pipeline: Vec<ReceiptDoc>,
    #[serde(default)]
    policy: Option<PolicyParams>,
    #[serde(default)]
    predecessors: Vec<Edge>,
}

#[derive(Deserialize)]
struct ReceiptDoc {
    sku: String,
    eta: u32,
    quantity: i64,
}

/// Demand: a list (element `i` = period `i + 1`) or a period-keyed map.
#[derive(Deserialize)]
#[serde(untagged)]
enum SalesDoc {
    List(Vec<Vec<i64>>),
    Map(BTreeMap<String, Vec<i64>>),
}

/// Lead times: a list, or a period-keyed map with optional `"default"` key.
#[derive(Deserialize)]
#[serde(untagged)]
enum LeadTimeDoc {
    List(Vec<u32>),
    Map(BTreeMap<String, u32>),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Build a [`SupplyChain`] from a JSON document string.
pub fn chain_from_json_str(json: &str) -> ChainResult<SupplyChain> {
    let doc: ChainDoc =
        serde_json::from_str(json).map_err(|e| ChainError::Parse(e.to_string()))?;

    let mut builder = ChainBuilder::new();
    for node in doc.nodes {
        builder = builder.node(node_spec(node)?);
    }
    for edge in doc.edges {
        builder = builder.edge(edge.source, edge.destination, edge.number);
    }
    builder.build()
}

/// Build a [`SupplyChain`] from a JSON file.
pub fn chain_from_json_path(path: &Path) -> ChainResult<SupplyChain> {
    let json = std::fs::read_to_string(path)?;
    chain_from_json_str(&json)
}

// ── Conversion helpers ────────────────────────────────────────────────────────

fn node_spec(doc: NodeDoc) -> ChainResult<NodeSpec> {
    let mut spec = NodeSpec::new(doc.id.clone()).backorders(doc.backorders);

    if let Some(sales) = doc.sales {
        spec = spec.sales(sales_schedule(sales, &doc.id)?);
    }
    if let Some(lead_time) = doc.lead_time {
        spec = spec.lead_time(lead_time_schedule(lead_time, &doc.id)?);
    }
    for (sku, quantity) in doc.stock {
        spec = spec.stock(sku, quantity);
    }
    for (sku, quantity) in doc.orders {
        spec = spec.order(sku, quantity);
    }
    for receipt in doc.pipeline {
        spec = spec.receipt(receipt.sku, receipt.eta, receipt.quantity);
    }
    if let Some(policy) = doc.policy {
        spec = spec.policy(policy);
    }
    for edge in doc.predecessors {
        spec = spec.predecessor_edge(edge);
    }
    Ok(spec)
}

fn sales_schedule(doc: SalesDoc, node: &str) -> ChainResult<SalesSchedule> {
    match doc {
        SalesDoc::List(lines) => Ok(SalesSchedule::from_lines(lines)),
        SalesDoc::Map(map) => {
            let mut schedule = SalesSchedule::new();
            for (key, lines) in map {
                schedule.set(parse_period(&key, node)?, lines);
            }
            Ok(schedule)
        }
    }
}

fn lead_time_schedule(doc: LeadTimeDoc, node: &str) -> ChainResult<LeadTimeSchedule> {
    match doc {
        LeadTimeDoc::List(values) => {
            let mut schedule = LeadTimeSchedule::new();
            for (i, lead_time) in values.into_iter().enumerate() {
                schedule.set(i as u32 + 1, lead_time);
            }
            Ok(schedule)
        }
        LeadTimeDoc::Map(map) => {
            let mut schedule = LeadTimeSchedule::new();
            for (key, lead_time) in map {
                if key == "default" {
                    schedule = schedule.with_default(lead_time);
                } else {
                    schedule.set(parse_period(&key, node)?, lead_time);
                }
            }
            Ok(schedule)
        }
    }
}

fn parse_period(key: &str, node: &str) -> ChainResult<u32> {
    key.parse::<u32>().map_err(|_| {
        ChainError::Parse(format!("node {node}: period key {key:?} is not a number"))
    })
}
