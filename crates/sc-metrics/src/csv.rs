//! CSV metric backend.
//!
//! Columns: `period,node,event,quantity,sku`, with `sku` empty for event
//! kinds that don't carry one.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use ::csv::Writer;

use crate::record::MetricRecord;
use crate::sink::MetricSink;
use crate::MetricsResult;

/// Writes the metric stream as CSV rows.
pub struct CsvMetricWriter<W: Write> {
    writer: Writer<W>,
    finished: bool,
}

impl CsvMetricWriter<File> {
    /// Create (or truncate) the file at `path` and write the header row.
    pub fn create(path: &Path) -> MetricsResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvMetricWriter<W> {
    /// Wrap any writer; writes the header row immediately.
    pub fn from_writer(out: W) -> MetricsResult<Self> {
        let mut writer = Writer::from_writer(out);
        writer.write_record(["period", "node", "event", "quantity", "sku"])?;
        Ok(Self {
            writer,
            finished: false,
        })
    }
}

impl<W: Write> MetricSink for CsvMetricWriter<W> {
    fn record(&mut self, record: &MetricRecord) -> MetricsResult<()> {
        self.writer.write_record([
            record.period.to_string(),
            record.node.clone(),
            record.event.as_str().to_string(),
            record.quantity.to_string(),
            record.sku.clone().unwrap_or_default(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> MetricsResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
