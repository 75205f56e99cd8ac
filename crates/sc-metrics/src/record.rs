//! The metric record emitted for every simulation event.

use serde::{Deserialize, Serialize};

/// The five event kinds a period can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// Demand (or a carried backorder) served from stock.
    SalesSatisfied,
    /// Demand that could not be served and was added to backorders.
    SalesBackordered,
    /// A matured pipeline receipt credited to stock.
    Receipt,
    /// Units shipped from a supplier into a child's pipeline.
    Release,
    /// A replenishment order proposed by the control strategy.
    Order,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::SalesSatisfied => "sales-satisfied",
            EventKind::SalesBackordered => "sales-backordered",
            EventKind::Receipt => "receipt",
            EventKind::Release => "release",
            EventKind::Order => "order",
        }
    }
}

/// One event, as written to the metric stream.
///
/// `sku` is present on `receipt` and `release` records: the SKU that moved,
/// which for receipts may differ from the owning node's SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub period: u32,
    pub node: String,
    pub event: EventKind,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}
