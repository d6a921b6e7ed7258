//! EquityCurve — cumulative balance path produced by one simulation.

use serde::{Deserialize, Serialize};

/// Cumulative balance values, seeded with the starting balance.
///
/// A curve built from `n` trade deltas has `n + 1` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    values: Vec<f64>,
}

impl EquityCurve {
    /// Fold `deltas` onto `starting_balance`, recording every intermediate value.
    pub fn from_deltas(starting_balance: f64, deltas: &[f64]) -> Self {
        let mut values = Vec::with_capacity(deltas.len() + 1);
        let mut balance = starting_balance;
        values.push(balance);
        for &delta in deltas {
            balance += delta;
            values.push(balance);
        }
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn starting_balance(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn final_balance(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// `(index, value)` pairs for charting.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().copied().enumerate()
    }
}

impl From<Vec<f64>> for EquityCurve {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}
