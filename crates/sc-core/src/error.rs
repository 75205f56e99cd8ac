//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where
//! provider failures can surface.

use thiserror::Error;

use crate::Period;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no lead time defined for {0}")]
    MissingLeadTime(Period),

    #[error("provider failed at {period}: {reason}")]
    Provider { period: Period, reason: String },
}

/// Shorthand result type for provider operations.
pub type CoreResult<T> = Result<T, CoreError>;
