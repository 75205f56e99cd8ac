//! The `MetricSink` trait and in-memory implementations.

use sc_chain::SupplyChain;
use sc_core::Period;

use crate::record::{EventKind, MetricRecord};
use crate::MetricsResult;

/// Receives the simulator's event stream.
///
/// `record` is called once per event, in emission order; sinks may buffer
/// but must preserve that order.  `period_end` fires after every completed
/// period with read-only access to the chain, for sinks that persist state
/// snapshots.  `finish` is called exactly once on every exit path of a run,
/// success or error, and must be idempotent.
pub trait MetricSink {
    fn record(&mut self, record: &MetricRecord) -> MetricsResult<()>;

    fn period_end(&mut self, _period: Period, _chain: &SupplyChain) -> MetricsResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> MetricsResult<()> {
        Ok(())
    }
}

/// A sink that discards everything.
pub struct NullSink;

impl MetricSink for NullSink {
    fn record(&mut self, _record: &MetricRecord) -> MetricsResult<()> {
        Ok(())
    }
}

/// Collects records in memory, in emission order.  Useful in tests and for
/// post-run summaries.
#[derive(Default)]
pub struct MemorySink {
    pub records: Vec<MetricRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected records of one kind, in emission order.
    pub fn of_kind(&self, kind: EventKind) -> Vec<&MetricRecord> {
        self.records.iter().filter(|r| r.event == kind).collect()
    }

    /// All collected records for one node, in emission order.
    pub fn for_node(&self, sku: &str) -> Vec<&MetricRecord> {
        self.records.iter().filter(|r| r.node == sku).collect()
    }

    /// Total quantity across records of one kind in one period.
    pub fn total(&self, period: u32, kind: EventKind) -> i64 {
        self.records
            .iter()
            .filter(|r| r.period == period && r.event == kind)
            .map(|r| r.quantity)
            .sum()
    }
}

impl MetricSink for MemorySink {
    fn record(&mut self, record: &MetricRecord) -> MetricsResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Fans every call out to two sinks, first `0` then `1`.
pub struct Tee<A: MetricSink, B: MetricSink>(pub A, pub B);

impl<A: MetricSink, B: MetricSink> MetricSink for Tee<A, B> {
    fn record(&mut self, record: &MetricRecord) -> MetricsResult<()> {
        self.0.record(record)?;
        self.1.record(record)
    }

    fn period_end(&mut self, period: Period, chain: &SupplyChain) -> MetricsResult<()> {
        self.0.period_end(period, chain)?;
        self.1.period_end(period, chain)
    }

    fn finish(&mut self) -> MetricsResult<()> {
        let first = self.0.finish();
        let second = self.1.finish();
        first.and(second)
    }
}
