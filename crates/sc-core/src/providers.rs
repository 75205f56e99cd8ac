//! Demand and lead-time providers.
//!
//! Both are modeled as one-method traits so callers can plug in anything from
//! a fixed schedule to a live data feed.  The schedule-backed defaults cover
//! the common case: a map from period to value, populated up front.
//!
//! Sales are consumed destructively: `pop` removes the period's order
//! lines, so a chain cannot be re-run without fresh providers.

use std::collections::BTreeMap;

use crate::{CoreError, CoreResult, Period};

// ── Traits ────────────────────────────────────────────────────────────────────

/// Source of exogenous demand for one node.
pub trait SalesProvider {
    /// Remove and return the demand order lines for `period`.
    ///
    /// Each element is one order quantity.  A period without demand returns
    /// an empty list.  Consumed exactly once per period.
    fn pop(&mut self, period: Period) -> CoreResult<Vec<i64>>;
}

/// Source of the lead time applied to orders placed in a given period.
pub trait LeadTimeProvider {
    /// Lead time, in periods, for orders placed at `period`.
    fn get(&self, period: Period) -> CoreResult<u32>;
}

// ── Schedule-backed defaults ──────────────────────────────────────────────────

/// A fixed demand schedule: order lines keyed by period.
#[derive(Clone, Debug, Default)]
pub struct SalesSchedule {
    by_period: BTreeMap<u32, Vec<i64>>,
}

impl SalesSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from consecutive per-period line lists, starting at period 1.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = Vec<i64>>,
    {
        let by_period = lines
            .into_iter()
            .enumerate()
            .map(|(i, l)| (i as u32 + 1, l))
            .collect();
        Self { by_period }
    }

    /// Set the order lines for one period, replacing any existing entry.
    pub fn set(&mut self, period: u32, lines: Vec<i64>) {
        self.by_period.insert(period, lines);
    }
}

impl SalesProvider for SalesSchedule {
    fn pop(&mut self, period: Period) -> CoreResult<Vec<i64>> {
        Ok(self.by_period.remove(&period.0).unwrap_or_default())
    }
}

/// A fixed lead-time schedule with an optional fallback default.
///
/// A lookup for a period that is neither scheduled nor covered by a default
/// is an error.
#[derive(Clone, Debug, Default)]
pub struct LeadTimeSchedule {
    by_period: BTreeMap<u32, u32>,
    default: Option<u32>,
}

impl LeadTimeSchedule {
    /// An empty schedule.  Every lookup fails until periods are `set` or a
    /// default is supplied.
    pub fn new() -> Self {
        Self::default()
    }

    /// The same lead time for every period.
    pub fn fixed(lead_time: u32) -> Self {
        Self {
            by_period: BTreeMap::new(),
            default: Some(lead_time),
        }
    }

    /// Fall back to `lead_time` for periods without an explicit entry.
    pub fn with_default(mut self, lead_time: u32) -> Self {
        self.default = Some(lead_time);
        self
    }

    /// Set the lead time for one period.
    pub fn set(&mut self, period: u32, lead_time: u32) {
        self.by_period.insert(period, lead_time);
    }
}

impl LeadTimeProvider for LeadTimeSchedule {
    fn get(&self, period: Period) -> CoreResult<u32> {
        self.by_period
            .get(&period.0)
            .copied()
            .or(self.default)
            .ok_or(CoreError::MissingLeadTime(period))
    }
}
