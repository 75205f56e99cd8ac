//! `sc-sim` — the period loop orchestrator.
//!
//! # Phase sequence, one period
//!
//! ```text
//! for period in 1..=T:
//!   ① Receive     — every node collects matured pipeline receipts.
//!   ② Assemble    — component stock is converted to finished units per BOM.
//!   ③ Backorders  — carried backorders are served from stock.
//!   ④ Demand      — the period's sales are served or backordered.
//!   ⑤ Release     — ascending LLC (suppliers first): each node ships
//!                   against its order book per the release strategy.
//!   ⑥ Order       — descending LLC (children first): each node proposes
//!                   orders per the control strategy; quantities explode
//!                   onto suppliers (or the node's own pipeline for roots).
//!   ⑦ Age         — every pipeline eta ticks down one period.
//! ```
//!
//! Each phase is a strict barrier: all nodes complete it before the next
//! begins.  Within a phase, iteration order is deterministic (insertion
//! order, or the LLC orderings noted above).  Metric records are emitted in
//! event order to a [`MetricSink`][sc_metrics::MetricSink]; a sink failure
//! terminates the run, and the sink is always `finish`ed on the way out.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sc_metrics::MemorySink;
//! use sc_sim::Simulator;
//! use sc_strategy::{Fractional, Rsq};
//!
//! let mut sim = Simulator::new(chain, Rsq, Fractional);
//! let mut sink = MemorySink::new();
//! sim.run(52, &mut sink)?;
//! ```

pub mod error;
pub mod sim;

#[cfg(test)]
mod tests;

pub use error::{SimError, SimResult};
pub use sim::Simulator;
