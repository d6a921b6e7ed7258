//! DDLab Runner — reducers, risk sizing, analysis pipeline and export.
//!
//! This crate builds on `ddlab-core` to provide:
//! - TOML analysis configuration with validation
//! - Drawdown and stagnation reducers over simulated equity curves
//! - Capital sizing and risk-of-ruin estimation
//! - Calendar-period returns of the historical log
//! - The end-to-end analysis runner and its serializable report
//! - JSON/CSV artifact export and a plain-text summary

pub mod config;
pub mod drawdown;
pub mod export;
pub mod metrics;
pub mod periods;
pub mod risk_profile;
pub mod runner;
pub mod stagnation;

pub use config::{AnalysisConfig, ConfigError, RiskConfig, MAX_SIMULATIONS};
pub use drawdown::{max_drawdown, max_drawdown_amount, worst_drawdown_amount, DrawdownStatistics};
pub use export::{
    export_curves_csv, export_json, export_trades_csv, generate_summary, import_json,
    load_artifacts, save_artifacts,
};
pub use metrics::{Occurrence, ReduceError};
pub use periods::{daily_returns, group_returns, MonthlyStats, PeriodAnalysis, PeriodReturns};
pub use risk_profile::{RiskProfile, RuinEstimator};
pub use runner::{
    run_analysis, run_analysis_from_points, AnalysisReport, ChartPoint, ChartSeries, RunError,
    SCHEMA_VERSION,
};
pub use stagnation::{max_stagnation, StagnationStatistics};
