//! BOM arcs.

use std::fmt;

use serde::Deserialize;

/// A directed bill-of-materials relation between two nodes.
///
/// `number` units of `source` are consumed to make one unit of `destination`;
/// equivalently, `source` is the upstream supplier and `destination` the
/// consuming child.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Edge {
    pub source: String,
    pub destination: String,
    pub number: i64,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        number: i64,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            number,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.destination)
    }
}
