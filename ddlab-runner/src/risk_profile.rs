//! Capital sizing from the worst simulated drawdown.
//!
//! The deepest peak-to-trough drop of any simulated curve, in account
//! currency, is scaled up so that loss consumes only `risk_fraction` of the
//! recommended capital:
//!
//! - `worst_loss = max over curves of (running peak - balance)`
//! - `recommended_capital = worst_loss / risk_fraction`
//! - `monthly_return_percentage = period_profit / recommended_capital × 100`

use serde::{Deserialize, Serialize};

use ddlab_core::domain::EquityCurve;

use crate::drawdown::{max_drawdown_amount, worst_drawdown_amount};
use crate::metrics::percentage;

/// How `risk_of_ruin` is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuinEstimator {
    /// Always 0.
    #[default]
    None,
    /// Share of simulated curves that lose the whole recommended capital.
    Empirical,
}

impl RuinEstimator {
    /// Risk of ruin as a percentage of curves.
    ///
    /// A curve is ruined when a peak-to-trough drop anywhere along it reaches
    /// `recommended_capital`.
    pub fn estimate(&self, curves: &[EquityCurve], recommended_capital: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Empirical => {
                if recommended_capital <= 0.0 || curves.is_empty() {
                    return 0.0;
                }
                let ruined = curves
                    .iter()
                    .filter(|c| max_drawdown_amount(c.values()) >= recommended_capital)
                    .count();
                percentage(ruined, curves.len())
            }
        }
    }
}

/// Recommended capital, expected monthly return and risk of ruin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Worst simulated peak-to-trough drop in account currency.
    pub worst_loss: f64,
    pub recommended_capital: f64,
    /// Profit per month used for the return figure.
    pub period_profit: f64,
    pub monthly_return_percentage: f64,
    pub risk_of_ruin: f64,
}

impl RiskProfile {
    /// Size capital from a currency worst loss. `risk_of_ruin` starts at 0.
    pub fn compute(worst_loss: f64, risk_fraction: f64, period_profit: f64) -> Self {
        let recommended_capital = if risk_fraction > 0.0 {
            worst_loss / risk_fraction
        } else {
            0.0
        };
        let monthly_return_percentage = if recommended_capital > 0.0 {
            period_profit / recommended_capital * 100.0
        } else {
            0.0
        };

        Self {
            worst_loss,
            recommended_capital,
            period_profit,
            monthly_return_percentage,
            risk_of_ruin: 0.0,
        }
    }

    /// Size capital from the deepest drawdown among `curves`.
    pub fn from_curves(curves: &[EquityCurve], risk_fraction: f64, period_profit: f64) -> Self {
        Self::compute(worst_drawdown_amount(curves), risk_fraction, period_profit)
    }

    /// Fill `risk_of_ruin` using `estimator` over the simulated curves.
    pub fn with_ruin_estimate(mut self, estimator: RuinEstimator, curves: &[EquityCurve]) -> Self {
        self.risk_of_ruin = estimator.estimate(curves, self.recommended_capital);
        self
    }
}
