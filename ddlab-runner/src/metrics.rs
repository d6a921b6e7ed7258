//! Shared statistics helpers for the reducers.
//!
//! Every helper is a pure function over a slice and returns 0.0 instead of
//! NaN/inf on empty input or a zero denominator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reducing simulated curves into statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    #[error("no equity curves to reduce")]
    NoCurves,
}

/// How many samples met a condition, and what share of the total that is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Occurrence {
    pub count: usize,
    /// `count / total * 100`.
    pub percentage: f64,
}

impl Occurrence {
    pub fn new(count: usize, total: usize) -> Self {
        Self {
            count,
            percentage: percentage(count, total),
        }
    }
}

/// `count / total * 100`, or 0.0 when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

pub fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n, not n - 1).
pub fn population_std_dev(values: &[f64]) -> f64 {
    // Constant input is exactly zero, not the rounding residue of the mean.
    if values.windows(2).all(|w| w[0] == w[1]) {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sort ascending with a total order so NaN can never panic the comparator.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}
