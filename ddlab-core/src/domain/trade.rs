//! Trade — a completed round trip reconstructed from the balance/equity log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A closed trade: the run of snapshots between the first open-position point
/// and the point where equity returned to balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_timestamp: NaiveDateTime,
    pub exit_timestamp: NaiveDateTime,
    /// Balance at exit minus balance at entry.
    pub profit: f64,
    pub duration_minutes: i64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }
}

/// Profit values of a trade list, in order.
pub fn profits(trades: &[Trade]) -> Vec<f64> {
    trades.iter().map(|t| t.profit).collect()
}
