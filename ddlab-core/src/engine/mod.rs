//! Engine: trade extraction and Monte Carlo trade-order resampling.

pub mod simulation;
pub mod trade_extraction;

pub use simulation::{
    run_simulations, run_simulations_with_progress, simulate_curve, ProgressFn, SimulationConfig,
    SimulationError, DEFAULT_SIMULATIONS, DEFAULT_STARTING_BALANCE,
};
pub use trade_extraction::extract_trades;
