//! Analysis runner: wires together parsing, extraction, simulation and the
//! reducers.
//!
//! Two entry points:
//! - `run_analysis()`: takes the raw history text. Used by the CLI.
//! - `run_analysis_from_points()`: takes already-parsed snapshots.
//!
//! Both are pure apart from logging; no files are touched.

use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use ddlab_core::data::{parse_trade_data, ParseError};
use ddlab_core::domain::{EquityCurve, TimeSeriesPoint, Trade};
use ddlab_core::engine::{extract_trades, run_simulations, SimulationError};

use crate::config::{AnalysisConfig, ConfigError};
use crate::drawdown::DrawdownStatistics;
use crate::metrics::ReduceError;
use crate::periods::{daily_returns, group_returns, MonthlyStats, PeriodAnalysis};
use crate::risk_profile::RiskProfile;
use crate::stagnation::StagnationStatistics;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("reduction error: {0}")]
    Reduce(#[from] ReduceError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Master seed actually used, including one drawn from entropy.
    pub seed: u64,
    pub n_simulations: usize,
    pub starting_balance: f64,
    pub trades: Vec<Trade>,
    pub drawdown: DrawdownStatistics,
    pub stagnation: StagnationStatistics,
    pub risk: RiskProfile,
    pub monthly: MonthlyStats,
    pub periods: PeriodAnalysis,
    pub curves: Vec<EquityCurve>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// One simulated curve as `(index, value)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub id: usize,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: usize,
    pub y: f64,
}

impl AnalysisReport {
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Net profit of the historical trade sequence.
    pub fn net_profit(&self) -> f64 {
        self.trades.iter().map(|t| t.profit).sum()
    }

    /// The first `limit` curves, ready for plotting.
    pub fn chart_series(&self, limit: usize) -> Vec<ChartSeries> {
        self.curves
            .iter()
            .take(limit)
            .enumerate()
            .map(|(id, curve)| ChartSeries {
                id,
                points: curve.points().map(|(x, y)| ChartPoint { x, y }).collect(),
            })
            .collect()
    }
}

/// Run the full analysis over raw account-history text.
pub fn run_analysis(
    raw: &str,
    config: &AnalysisConfig,
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    let points = parse_trade_data(raw)?;
    debug!(points = points.len(), "parsed account history");
    analyze(&points, config, cancel)
}

/// Run the full analysis over parsed snapshots — no parsing step.
pub fn run_analysis_from_points(
    points: &[TimeSeriesPoint],
    config: &AnalysisConfig,
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    analyze(points, config, cancel)
}

fn analyze(
    points: &[TimeSeriesPoint],
    config: &AnalysisConfig,
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisReport, RunError> {
    let sim = &config.simulation;

    let trades = extract_trades(points);
    debug!(trades = trades.len(), "extracted trades");

    let rng = sim.rng_hierarchy();
    let curves = run_simulations(&trades, sim, &rng, cancel)?;

    let drawdown = DrawdownStatistics::from_curves(&curves)?;
    let stagnation = StagnationStatistics::from_curves(&curves)?;

    let grouped = group_returns(&daily_returns(points));
    let monthly = MonthlyStats::from_returns(&grouped.monthly);
    let periods = PeriodAnalysis::from_returns(&grouped);

    let period_profit = config.risk.period_profit.unwrap_or(monthly.average);
    let risk = RiskProfile::from_curves(&curves, config.risk.risk_fraction, period_profit)
        .with_ruin_estimate(config.risk.ruin_estimator, &curves);

    info!(
        seed = rng.master_seed(),
        trades = trades.len(),
        simulations = curves.len(),
        max_drawdown = drawdown.max_drawdown,
        worst_stagnation = stagnation.worst,
        recommended_capital = risk.recommended_capital,
        "analysis complete"
    );

    Ok(AnalysisReport {
        schema_version: SCHEMA_VERSION,
        seed: rng.master_seed(),
        n_simulations: sim.n_simulations,
        starting_balance: sim.starting_balance,
        trades,
        drawdown,
        stagnation,
        risk,
        monthly,
        periods,
        curves,
    })
}
