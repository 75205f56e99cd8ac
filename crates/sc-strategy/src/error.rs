use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid parameter on node {node}: {reason}")]
    InvalidParameter { node: String, reason: String },
}

pub type StrategyResult<T> = Result<T, StrategyError>;
