//! Stagnation reducer: the longest stretch each curve spends without a new
//! equity high.
//!
//! Lengths are counted in curve points (one point per trade), not calendar time.

use serde::{Deserialize, Serialize};

use ddlab_core::domain::EquityCurve;

use crate::metrics::ReduceError;

/// Longest run of points that fail to set a strictly higher peak.
pub fn max_stagnation(values: &[f64]) -> usize {
    let Some((&first, rest)) = values.split_first() else {
        return 0;
    };
    let mut peak = first;
    let mut run = 0usize;
    let mut longest = 0usize;

    for &value in rest {
        if value > peak {
            peak = value;
            run = 0;
        } else {
            run += 1;
            longest = longest.max(run);
        }
    }
    longest
}

/// Best / average / worst stagnation over all simulated curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagnationStatistics {
    /// Shortest longest-stagnation across curves.
    pub best: usize,
    /// Mean rounded to the nearest point.
    pub average: usize,
    pub worst: usize,
}

impl StagnationStatistics {
    pub fn from_curves(curves: &[EquityCurve]) -> Result<Self, ReduceError> {
        let lengths = curves.iter().map(|c| max_stagnation(c.values())).collect();
        Self::from_lengths(lengths)
    }

    pub fn from_lengths(mut lengths: Vec<usize>) -> Result<Self, ReduceError> {
        if lengths.is_empty() {
            return Err(ReduceError::NoCurves);
        }
        lengths.sort_unstable();

        let total: usize = lengths.iter().sum();
        let average = (total as f64 / lengths.len() as f64).round() as usize;

        Ok(Self {
            best: lengths[0],
            average,
            worst: lengths[lengths.len() - 1],
        })
    }
}
