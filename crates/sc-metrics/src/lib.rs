//! `sc-metrics` — the metric-record stream and its output backends.
//!
//! The simulator produces one [`MetricRecord`] per event and hands it to a
//! [`MetricSink`]; sinks persist, buffer, or discard records but must
//! preserve their order.  Backends provided:
//!
//! | Sink                | Output                                            |
//! |---------------------|---------------------------------------------------|
//! | [`JsonlWriter`]     | one JSON object per line (canonical format)       |
//! | [`CsvMetricWriter`] | `period,node,event,quantity,sku` rows             |
//! | [`SnapshotWriter`]  | per-period node-state JSONL (stock, orders, ...)  |
//! | [`MemorySink`]      | in-memory `Vec` (tests, summaries)                |
//! | [`NullSink`]        | discards everything                               |
//! | [`Tee`]             | fans records out to two sinks                     |
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut sink = Tee(
//!     JsonlWriter::create(Path::new("out/metrics.jsonl"))?,
//!     SnapshotWriter::create(Path::new("out/snapshots.jsonl"))?,
//! );
//! simulator.run(52, &mut sink)?;
//! ```

pub mod csv;
pub mod error;
pub mod jsonl;
pub mod record;
pub mod sink;
pub mod snapshot;


pub use self::csv::CsvMetricWriter;
pub use error::{MetricsError, MetricsResult};
pub use jsonl::JsonlWriter;
pub use record::{EventKind, MetricRecord};
pub use sink::{MemorySink, MetricSink, NullSink, Tee};
pub use snapshot::SnapshotWriter;
