use std::fmt::{self, Display};

use derive_more::AddAssign;
use serde::{Deserialize, Serialize};

use crate::chain::ChainCost;
use crate::prelude::*;

/// Counters of distance computations. Summed over queries with `+=`.
#[derive(Default, Clone, Copy, AddAssign, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainStats {
    pub queries: usize,
    /// Real anchors, without the sentinels.
    pub anchors: usize,
    /// Total length of the real anchors.
    pub anchor_len: usize,
    /// The computed distance.
    pub distance: Cost,
    /// Passes of the chaining DP.
    pub passes: usize,
    pub seconds: f64,
}

impl ChainStats {
    pub fn new(set: &AnchorSet, result: ChainCost, seconds: f64) -> Self {
        let real = set.real();
        Self {
            queries: 1,
            anchors: real.len(),
            anchor_len: real.iter().map(|a| a.len as usize).sum(),
            distance: result.cost,
            passes: result.passes,
            seconds,
        }
    }

    /// Average number of anchors per query.
    pub fn anchors_per_query(&self) -> f64 {
        if self.queries == 0 {
            0.
        } else {
            self.anchors as f64 / self.queries as f64
        }
    }
}

impl Display for ChainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} queries, {} anchors ({:.1} per query, total length {}), total distance {}, {} passes, {:.6}s",
            self.queries,
            self.anchors,
            self.anchors_per_query(),
            self.anchor_len,
            self.distance,
            self.passes,
            self.seconds
        )
    }
}
