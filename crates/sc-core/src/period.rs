//! Simulation period counter.
//!
//! Time is a monotonically increasing integer period.  Periods are 1-based:
//! a run of `T` periods covers `1..=T`.  Using an integer as the canonical
//! time unit keeps review-time arithmetic exact and comparisons O(1).

use std::fmt;

/// An absolute, 1-based simulation period.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Period(pub u32);

impl Period {
    /// The first period of a fresh run.
    pub const FIRST: Period = Period(1);

    /// Return the period `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Period {
        Period(self.0 + n)
    }

    /// True when this period is a review moment for the given review time,
    /// i.e. `period % review_time == 0`.  A zero review time never reviews.
    #[inline]
    pub fn is_review(self, review_time: u32) -> bool {
        review_time > 0 && self.0 % review_time == 0
    }
}

impl std::ops::Add<u32> for Period {
    type Output = Period;
    #[inline]
    fn add(self, rhs: u32) -> Period {
        Period(self.0 + rhs)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
