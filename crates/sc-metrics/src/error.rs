//! Error types for sc-metrics.

use thiserror::Error;

/// Errors that can occur while writing the metric stream.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, MetricsError>`.
pub type MetricsResult<T> = Result<T, MetricsError>;
