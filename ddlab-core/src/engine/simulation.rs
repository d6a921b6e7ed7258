//! Monte Carlo trade-order resampling.
//!
//! Each simulation shuffles the realized trade profits (Fisher–Yates via
//! `SliceRandom::shuffle`) and replays them onto the starting balance. Every
//! iteration draws from its own generator derived from the master seed, so the
//! output is identical for any thread count and any scheduling order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{profits, EquityCurve, Trade};
use crate::rng::{RngHierarchy, SHUFFLE_STREAM};

pub const DEFAULT_STARTING_BALANCE: f64 = 10_000.0;
pub const DEFAULT_SIMULATIONS: usize = 1000;

/// Configuration for the resampling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of simulated equity curves.
    pub n_simulations: usize,
    /// Balance every curve starts from.
    pub starting_balance: f64,
    /// Master seed. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Worker threads. 1 runs on the calling thread.
    pub threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_simulations: DEFAULT_SIMULATIONS,
            starting_balance: DEFAULT_STARTING_BALANCE,
            seed: None,
            threads: 1,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.n_simulations == 0 {
            return Err(SimulationError::InvalidSimulationCount);
        }
        if !self.starting_balance.is_finite() || self.starting_balance <= 0.0 {
            return Err(SimulationError::InvalidStartingBalance(self.starting_balance));
        }
        Ok(())
    }

    /// RNG hierarchy for this run: the configured seed, or a fresh one.
    pub fn rng_hierarchy(&self) -> RngHierarchy {
        match self.seed {
            Some(seed) => RngHierarchy::new(seed),
            None => RngHierarchy::from_entropy(),
        }
    }
}

/// Errors from the simulation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("simulation count must be at least 1")]
    InvalidSimulationCount,
    #[error("starting balance must be a positive finite number, got {0}")]
    InvalidStartingBalance(f64),
    #[error("cancelled after {completed} of {requested} simulations")]
    Cancelled { completed: usize, requested: usize },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Shuffle `profits` with the supplied generator and replay them as a curve.
pub fn simulate_curve<R: Rng + ?Sized>(
    profits: &[f64],
    starting_balance: f64,
    rng: &mut R,
) -> EquityCurve {
    let mut order = profits.to_vec();
    order.shuffle(rng);
    EquityCurve::from_deltas(starting_balance, &order)
}

/// Callback receiving the number of curves finished so far.
pub type ProgressFn<'a> = &'a (dyn Fn(usize) + Sync);

/// Run `config.n_simulations` independent resamples of the trade sequence.
///
/// Curves are returned in iteration order. The cancellation flag is checked
/// before every iteration; a raised flag aborts with `Cancelled`.
pub fn run_simulations(
    trades: &[Trade],
    config: &SimulationConfig,
    rng: &RngHierarchy,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<EquityCurve>, SimulationError> {
    run_simulations_with_progress(trades, config, rng, None, cancel)
}

/// [`run_simulations`] with a progress callback.
///
/// - `progress`: called after every finished curve with the running count.
///   On a pool it runs on worker threads and counts may arrive out of order.
/// - `cancel`: optional flag to stop the run cooperatively.
pub fn run_simulations_with_progress(
    trades: &[Trade],
    config: &SimulationConfig,
    rng: &RngHierarchy,
    progress: Option<ProgressFn<'_>>,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<EquityCurve>, SimulationError> {
    config.validate()?;

    let pnl = profits(trades);
    if pnl.is_empty() {
        tracing::warn!("no trades to resample; every curve is the starting balance");
    }
    tracing::debug!(
        simulations = config.n_simulations,
        trades = pnl.len(),
        threads = config.threads,
        seed = rng.master_seed(),
        "running trade-order simulations"
    );

    if config.threads > 1 {
        run_parallel(&pnl, config, rng, progress, cancel)
    } else {
        run_serial(&pnl, config, rng, progress, cancel)
    }
}

fn run_serial(
    pnl: &[f64],
    config: &SimulationConfig,
    rng: &RngHierarchy,
    progress: Option<ProgressFn<'_>>,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<EquityCurve>, SimulationError> {
    let mut curves = Vec::with_capacity(config.n_simulations);
    for i in 0..config.n_simulations {
        if is_cancelled(cancel) {
            return Err(SimulationError::Cancelled {
                completed: i,
                requested: config.n_simulations,
            });
        }
        let mut iter_rng = rng.rng_for(SHUFFLE_STREAM, i as u64);
        curves.push(simulate_curve(pnl, config.starting_balance, &mut iter_rng));
        if let Some(cb) = progress {
            cb(curves.len());
        }
    }
    Ok(curves)
}

fn run_parallel(
    pnl: &[f64],
    config: &SimulationConfig,
    rng: &RngHierarchy,
    progress: Option<ProgressFn<'_>>,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<EquityCurve>, SimulationError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| SimulationError::ThreadPool(e.to_string()))?;

    let completed = AtomicUsize::new(0);
    let curves: Option<Vec<EquityCurve>> = pool.install(|| {
        (0..config.n_simulations)
            .into_par_iter()
            .map(|i| {
                if is_cancelled(cancel) {
                    return None;
                }
                let mut iter_rng = rng.rng_for(SHUFFLE_STREAM, i as u64);
                let curve = simulate_curve(pnl, config.starting_balance, &mut iter_rng);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = progress {
                    cb(done);
                }
                Some(curve)
            })
            .collect()
    });

    curves.ok_or_else(|| SimulationError::Cancelled {
        completed: completed.load(Ordering::Relaxed),
        requested: config.n_simulations,
    })
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|f| f.load(Ordering::Relaxed))
}
