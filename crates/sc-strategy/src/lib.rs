//! `sc-strategy` — pluggable ordering and release policies.
//!
//! Two extension points drive the simulator's decision phases:
//!
//! - [`ControlStrategy`]: how much a node orders from its suppliers.
//!   Defaults: [`Rsq`] (periodic reorder-level/batch-size) and [`MeRs`]
//!   (multi-echelon order-up-to).
//! - [`ReleaseStrategy`]: how a supplier splits scarce stock across
//!   competing downstream orders.  Default: [`Fractional`] (proportional
//!   allocation).
//!
//! Strategies are stateless; they read the chain and return quantities, and
//! the simulator applies the results.  This keeps them trivially idempotent:
//! calling one twice against unchanged state yields the same answer.

pub mod control;
pub mod error;
pub mod release;


pub use control::{ControlStrategy, MeRs, Rsq};
pub use error::{StrategyError, StrategyResult};
pub use release::{Fractional, ReleaseStrategy};
