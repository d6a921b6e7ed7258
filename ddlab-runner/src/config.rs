//! Serializable analysis configuration, loaded from TOML.
//!
//! ```toml
//! [simulation]
//! n_simulations = 1000
//! starting_balance = 10000.0
//! seed = 42
//! threads = 4
//!
//! [risk]
//! risk_fraction = 0.2
//! period_profit = 799.20
//! ruin_estimator = "empirical"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ddlab_core::engine::{SimulationConfig, SimulationError};

use crate::risk_profile::RuinEstimator;

/// Upper bound on simulations per run.
pub const MAX_SIMULATIONS: usize = 100_000;

/// Share of capital the user is prepared to lose at the worst drawdown.
pub const DEFAULT_RISK_FRACTION: f64 = 0.20;

/// Errors from loading or validating an `AnalysisConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("n_simulations must be between 1 and 100000, got {0}")]
    SimulationCount(usize),
    #[error("threads must be at least 1")]
    Threads,
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("risk_fraction must be in (0, 1], got {0}")]
    RiskFraction(f64),
    #[error("period_profit must be finite, got {0}")]
    PeriodProfit(f64),
}

/// Everything one analysis run needs besides the history itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub simulation: SimulationConfig,
    pub risk: RiskConfig,
}

/// Capital sizing inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskConfig {
    /// Fraction of capital that the worst drawdown may consume.
    pub risk_fraction: f64,
    /// Expected profit per month in account currency. `None` uses the
    /// average monthly profit observed in the history.
    pub period_profit: Option<f64>,
    pub ruin_estimator: RuinEstimator,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_fraction: DEFAULT_RISK_FRACTION,
            period_profit: None,
            ruin_estimator: RuinEstimator::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.simulation.n_simulations;
        if n == 0 || n > MAX_SIMULATIONS {
            return Err(ConfigError::SimulationCount(n));
        }
        if self.simulation.threads == 0 {
            return Err(ConfigError::Threads);
        }
        self.simulation.validate()?;

        let fraction = self.risk.risk_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ConfigError::RiskFraction(fraction));
        }
        if let Some(profit) = self.risk.period_profit {
            if !profit.is_finite() {
                return Err(ConfigError::PeriodProfit(profit));
            }
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulation.seed = Some(seed);
        self
    }
}
