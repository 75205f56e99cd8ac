//! `sc-chain` — the supply-chain graph and its per-node state.
//!
//! A [`SupplyChain`] couples an immutable topology (BOM adjacency, low-level
//! codes, precomputed phase orderings) with mutable per-node state cells
//! ([`Node`]: stock, backorders, order book, pipeline).  The topology is
//! fixed at construction time by [`ChainBuilder`]; simulation mutates only
//! node state.
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`edge`]    | `Edge` (BOM arc with multiplicity)                      |
//! | [`node`]    | `Node`, `PolicyParams`, per-period node operations      |
//! | [`chain`]   | `SupplyChain`: queries, inventory position, feasibility |
//! | [`builder`] | `ChainBuilder` + `NodeSpec`: validated construction     |
//! | [`parse`]   | JSON chain loader                                       |
//! | [`error`]   | `ChainError`, `ChainResult`                             |

pub mod builder;
pub mod chain;
pub mod edge;
pub mod error;
pub mod node;
pub mod parse;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{ChainBuilder, NodeSpec};
pub use chain::SupplyChain;
pub use edge::Edge;
pub use error::{ChainError, ChainResult};
pub use node::{Node, PolicyParams, SaleLine};
pub use parse::{chain_from_json_path, chain_from_json_str};
