//! DDLab Core — history parsing, trade extraction, Monte Carlo resampling.
//!
//! This crate contains the forward-only front half of the pipeline:
//! - Domain types (snapshots, trades, equity curves)
//! - Account-history log parsing with typed errors
//! - Trade extraction from balance/equity divergence
//! - Deterministic RNG hierarchy
//! - Trade-order resampling engine (serial or rayon pool, cancellable)

pub mod data;
pub mod domain;
pub mod engine;
pub mod rng;

pub use data::{parse_trade_data, ParseError};
pub use domain::{EquityCurve, TimeSeriesPoint, Trade};
pub use engine::{extract_trades, run_simulations, SimulationConfig, SimulationError};
pub use rng::RngHierarchy;
