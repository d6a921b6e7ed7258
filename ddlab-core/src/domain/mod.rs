//! Domain types for DDLab

pub mod curve;
pub mod point;
pub mod trade;

pub use curve::EquityCurve;
pub use point::TimeSeriesPoint;
pub use trade::{profits, Trade};
