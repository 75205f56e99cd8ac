use sc_core::CoreError;
use sc_metrics::MetricsError;
use sc_strategy::StrategyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A sales or lead-time provider failed; the period is aborted.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// The metric sink failed; the run is terminated.
    #[error("metric sink error: {0}")]
    Metrics(#[from] MetricsError),

    /// A period at or before one already simulated was requested again.
    /// Sales are consumed destructively, so a replay would silently run
    /// against empty demand.
    #[error("period {period} was already covered (simulated through period {last}); runs must advance strictly")]
    ReplayedPeriod { period: u32, last: u32 },

    /// A release strategy asked for more than the node has on hand.
    #[error("node {node} cannot release {requested} units ({on_hand} on hand)")]
    ReleaseExceedsStock {
        node: String,
        on_hand: i64,
        requested: i64,
    },

    /// A release strategy shipped more to a child than the child ordered.
    #[error("node {node} released {requested} to {child} but only {owed} is on order")]
    ReleaseExceedsOrder {
        node: String,
        child: String,
        owed: i64,
        requested: i64,
    },

    /// A phase-boundary state check failed (debug builds).
    #[error("invariant violated at node {node} after {phase} phase: {detail}")]
    InvariantViolation {
        node: String,
        phase: &'static str,
        detail: String,
    },
}

pub type SimResult<T> = Result<T, SimError>;
