//! TimeSeriesPoint — one balance/equity snapshot from an account history log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single account snapshot: closed balance, floating equity, deposit load.
///
/// `equity != balance` means at least one position was open when the snapshot
/// was taken. Points are kept in the order they appear in the log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub balance: f64,
    pub equity: f64,
    pub deposit_load: f64,
}

impl TimeSeriesPoint {
    /// True when floating equity differs from the closed balance.
    pub fn has_open_position(&self) -> bool {
        self.equity != self.balance
    }
}
