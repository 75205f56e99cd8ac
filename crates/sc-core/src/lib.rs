//! `sc-core` — foundational types for the supply-chain simulation workspace.
//!
//! This crate is a dependency of every other `sc-*` crate.  It intentionally
//! has no `sc-*` dependencies and only `thiserror` externally.
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `NodeId` (dense index of a node / SKU location)       |
//! | [`period`]    | `Period` (1-based simulation period counter)          |
//! | [`qty`]       | `Qty` (SKU-keyed integer quantity map)                |
//! | [`receipt`]   | `Receipt`, `Pipeline` (in-transit shipments)          |
//! | [`providers`] | `SalesProvider`, `LeadTimeProvider` + schedule impls  |
//! | [`error`]     | `CoreError`, `CoreResult`                             |

pub mod error;
pub mod ids;
pub mod period;
pub mod providers;
pub mod qty;
pub mod receipt;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::NodeId;
pub use period::Period;
pub use providers::{LeadTimeProvider, LeadTimeSchedule, SalesProvider, SalesSchedule};
pub use qty::Qty;
pub use receipt::{Pipeline, Receipt};
