//! JSONL metric backend: one JSON object per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::record::MetricRecord;
use crate::sink::MetricSink;
use crate::MetricsResult;

/// Writes each record as a single JSON line.
pub struct JsonlWriter<W: Write> {
    out: W,
    finished: bool,
}

impl JsonlWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> MetricsResult<Self> {
        Ok(Self::from_writer(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonlWriter<W> {
    /// Wrap any writer, e.g. a `Vec<u8>` in tests.
    pub fn from_writer(out: W) -> Self {
        Self {
            out,
            finished: false,
        }
    }

    /// Unwrap the inner writer (e.g. to inspect a buffer after a run).
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MetricSink for JsonlWriter<W> {
    fn record(&mut self, record: &MetricRecord) -> MetricsResult<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
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
