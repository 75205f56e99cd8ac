//! Chain configuration errors.
//!
//! All of these are fatal at construction time: a chain that fails to build
//! never runs a period.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("duplicate node id {0}")]
    DuplicateNode(String),

    #[error("{context} references unknown node {sku}")]
    UnknownNode { context: String, sku: String },

    #[error("edge {edge} has invalid multiplicity {number} (must be at least 1)")]
    InvalidMultiplicity { edge: String, number: i64 },

    #[error("node {node} defines predecessor edge {edge} whose destination is not {node}")]
    PredecessorMismatch { node: String, edge: String },

    #[error("cycle in bill of materials involving: {0}")]
    Cycle(String),

    #[error("invalid policy on node {node}: {reason}")]
    InvalidPolicy { node: String, reason: String },

    #[error("node {node} has an ordering policy but no lead-time provider")]
    MissingLeadTime { node: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for chain construction.
pub type ChainResult<T> = Result<T, ChainError>;
