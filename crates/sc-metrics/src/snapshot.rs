//! Per-period node-state snapshots.
//!
//! One JSON line per node per period: stock, backorders, order book, and the
//! pipeline contents.  This is a diagnostic side channel next to the metric
//! stream, not part of the record contract.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use sc_chain::SupplyChain;
use sc_core::Period;

use crate::record::MetricRecord;
use crate::sink::MetricSink;
use crate::MetricsResult;

#[derive(Serialize)]
struct ReceiptRow<'a> {
    sku: &'a str,
    eta: u32,
    quantity: i64,
}

#[derive(Serialize)]
struct NodeRow<'a> {
    period: u32,
    node: &'a str,
    stock: BTreeMap<&'a str, i64>,
    backorders: i64,
    orders: BTreeMap<&'a str, i64>,
    pipeline: Vec<ReceiptRow<'a>>,
}

/// Writes one state row per node at the end of every period.
///
/// Ignores individual metric records; combine with a record-writing sink via
/// [`Tee`][crate::Tee] when both streams are wanted.
pub struct SnapshotWriter<W: Write> {
    out: W,
    finished: bool,
}

impl SnapshotWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> MetricsResult<Self> {
        Ok(Self::from_writer(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> SnapshotWriter<W> {
    pub fn from_writer(out: W) -> Self {
        Self {
            out,
            finished: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MetricSink for SnapshotWriter<W> {
    fn record(&mut self, _record: &MetricRecord) -> MetricsResult<()> {
        Ok(())
    }

    fn period_end(&mut self, period: Period, chain: &SupplyChain) -> MetricsResult<()> {
        for id in chain.node_ids() {
            let node = chain.node(id);

            // Zero entries are semantically absent; keep rows compact.
            let stock: BTreeMap<&str, i64> = node
                .stock
                .iter()
                .filter(|&(_, v)| v != 0)
                .map(|(sku, v)| (chain.sku_of(sku), v))
                .collect();
            let orders: BTreeMap<&str, i64> = node
                .orders
                .iter()
                .filter(|&(_, v)| v != 0)
                .map(|(child, v)| (chain.sku_of(child), v))
                .collect();
            let pipeline: Vec<ReceiptRow<'_>> = node
                .pipeline
                .iter()
                .map(|r| ReceiptRow {
                    sku: chain.sku_of(r.sku),
                    eta: r.eta,
                    quantity: r.quantity,
                })
                .collect();

            let row = NodeRow {
                period: period.0,
                node: node.sku(),
                stock,
                backorders: node.backorders,
                orders,
                pipeline,
            };
            serde_json::to_writer(&mut self.out, &row)?;
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> MetricsResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
