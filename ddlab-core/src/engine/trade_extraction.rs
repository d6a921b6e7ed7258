//! Trade extraction — converts balance/equity snapshots into closed trades.
//!
//! Pure function: time-series points in, trade records out. A trade opens at
//! the first snapshot where equity departs from balance and closes at the
//! first flat snapshot that follows an open one.

use crate::domain::{TimeSeriesPoint, Trade};

/// Extract closed trades from an ordered snapshot sequence.
///
/// Points are walked pairwise `(previous, current)` starting at the second
/// point. A position still open at the end of the data produces no trade.
pub fn extract_trades(points: &[TimeSeriesPoint]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut entry: Option<&TimeSeriesPoint> = None;

    for pair in points.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if entry.is_none() && current.has_open_position() {
            entry = Some(current);
        }

        if let Some(open) = entry {
            if !current.has_open_position() && previous.has_open_position() {
                trades.push(build_trade(open, current));
                entry = None;
            }
        }
    }

    if let Some(open) = entry {
        tracing::warn!(
            entry = %open.timestamp,
            "position still open at end of data; trade dropped"
        );
    }

    trades
}

fn build_trade(entry: &TimeSeriesPoint, exit: &TimeSeriesPoint) -> Trade {
    Trade {
        entry_timestamp: entry.timestamp,
        exit_timestamp: exit.timestamp,
        profit: exit.balance - entry.balance,
        duration_minutes: (exit.timestamp - entry.timestamp).num_minutes(),
    }
}
