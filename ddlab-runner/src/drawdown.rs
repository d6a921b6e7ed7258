//! Drawdown reducer: worst peak-to-trough decline per curve, aggregated
//! across all simulated curves.
//!
//! Drawdowns are negative fractions of the running peak (-0.15 = 15% below
//! the peak). The same unit is used for samples, mean, σ and thresholds.
//! [`max_drawdown_amount`] gives the same decline in account currency for
//! capital sizing.

use serde::{Deserialize, Serialize};

use ddlab_core::domain::EquityCurve;

use crate::metrics::{mean_f64, population_std_dev, sort_ascending, Occurrence, ReduceError};

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 if the curve is constant, monotonically increasing or has
/// fewer than two points.
pub fn max_drawdown(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mut peak = values[0];
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Largest peak-to-trough drop in account currency, as a non-negative amount.
///
/// Measured against the running peak, so a decline after the curve has grown
/// counts in full.
pub fn max_drawdown_amount(values: &[f64]) -> f64 {
    let Some((&first, rest)) = values.split_first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut worst = 0.0_f64;
    for &value in rest {
        peak = peak.max(value);
        worst = worst.max(peak - value);
    }
    worst
}

/// Deepest currency drawdown over all curves; 0.0 for no curves.
pub fn worst_drawdown_amount(curves: &[EquityCurve]) -> f64 {
    curves
        .iter()
        .map(|c| max_drawdown_amount(c.values()))
        .fold(0.0, f64::max)
}

/// Summary of max-drawdown samples, one per simulated curve.
///
/// "max" is the worst (most negative) sample and "min" the mildest, so
/// `max_drawdown <= avg_drawdown <= min_drawdown <= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownStatistics {
    pub max_drawdown: f64,
    pub avg_drawdown: f64,
    pub min_drawdown: f64,
    /// Population standard deviation of the samples.
    pub std_deviation: f64,
    /// `avg - 1σ`: one band deeper than the average.
    pub avg_plus_one_std: f64,
    pub avg_plus_two_std: f64,
    pub avg_plus_three_std: f64,
    /// Samples at or beyond `avg - 1σ`.
    pub occurrences_one_std: Occurrence,
    pub occurrences_two_std: Occurrence,
    pub occurrences_three_std: Occurrence,
    pub sample_count: usize,
}

impl DrawdownStatistics {
    pub fn from_curves(curves: &[EquityCurve]) -> Result<Self, ReduceError> {
        let samples = curves.iter().map(|c| max_drawdown(c.values())).collect();
        Self::from_samples(samples)
    }

    pub fn from_samples(mut samples: Vec<f64>) -> Result<Self, ReduceError> {
        if samples.is_empty() {
            return Err(ReduceError::NoCurves);
        }
        sort_ascending(&mut samples);

        let n = samples.len();
        let worst = samples[0];
        let mildest = samples[n - 1];
        // Rounding in the sum can land the mean a hair outside the sample range.
        let avg = mean_f64(&samples).clamp(worst, mildest);
        let std = population_std_dev(&samples);

        let band = |k: f64| avg - k * std;
        let beyond = |threshold: f64| {
            let count = samples.iter().filter(|&&s| s <= threshold).count();
            Occurrence::new(count, n)
        };

        let stats = Self {
            max_drawdown: worst,
            avg_drawdown: avg,
            min_drawdown: mildest,
            std_deviation: std,
            avg_plus_one_std: band(1.0),
            avg_plus_two_std: band(2.0),
            avg_plus_three_std: band(3.0),
            occurrences_one_std: beyond(band(1.0)),
            occurrences_two_std: beyond(band(2.0)),
            occurrences_three_std: beyond(band(3.0)),
            sample_count: n,
        };
        tracing::debug!(
            samples = n,
            worst = stats.max_drawdown,
            average = stats.avg_drawdown,
            std = stats.std_deviation,
            "reduced drawdown samples"
        );
        Ok(stats)
    }

    pub fn thresholds(&self) -> [f64; 3] {
        [
            self.avg_plus_one_std,
            self.avg_plus_two_std,
            self.avg_plus_three_std,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Max drawdown ──

    #[test]
    fn max_drawdown_known() {
        let eq = [10_000.0, 10_200.0, 9_800.0, 10_500.0, 9_000.0, 11_000.0];
        // Peak 10.5k, trough 9k → (9000 - 10500) / 10500
        let dd = max_drawdown(&eq);
        assert!((dd - (-0.142_857)).abs() < 1e-6);
    }

    #[test]
    fn max_drawdown_monotonic_increase() {
        let eq: Vec<f64> = (0..50).map(|i| 10_000.0 + i as f64 * 10.0).collect();
        assert_eq!(max_drawdown(&eq), 0.0);
    }

    #[test]
    fn max_drawdown_constant_and_short() {
        assert_eq!(max_drawdown(&[10_000.0; 20]), 0.0);
        assert_eq!(max_drawdown(&[10_000.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn max_drawdown_first_point_drop() {
        let dd = max_drawdown(&[100.0, 50.0]);
        assert!((dd - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn non_positive_peak_is_skipped() {
        // Peaks at or below zero give no meaningful relative decline.
        assert_eq!(max_drawdown(&[0.0, -10.0, -20.0]), 0.0);
    }

    #[test]
    fn amount_is_measured_from_the_running_peak() {
        // Doubles, then gives back 4000: 20% relative but 4000 in currency.
        let eq = [10_000.0, 20_000.0, 16_000.0];
        assert!((max_drawdown(&eq) - (-0.2)).abs() < 1e-12);
        assert!((max_drawdown_amount(&eq) - 4_000.0).abs() < 1e-9);
    }

    #[test]
    fn amount_known_curve() {
        let eq = [10_000.0, 10_200.0, 9_800.0, 10_500.0, 9_000.0, 11_000.0];
        assert!((max_drawdown_amount(&eq) - 1_500.0).abs() < 1e-9);
        assert_eq!(max_drawdown_amount(&[10_000.0, 10_100.0]), 0.0);
        assert_eq!(max_drawdown_amount(&[]), 0.0);
    }

    #[test]
    fn worst_amount_over_curves() {
        let curves = vec![
            EquityCurve::from(vec![10_000.0, 9_000.0]),
            EquityCurve::from(vec![10_000.0, 20_000.0, 16_000.0]),
            EquityCurve::from(vec![10_000.0]),
        ];
        assert!((worst_drawdown_amount(&curves) - 4_000.0).abs() < 1e-9);
        assert_eq!(worst_drawdown_amount(&[]), 0.0);
    }

    // ── Aggregation ──

    #[test]
    fn empty_samples_is_error() {
        assert_eq!(
            DrawdownStatistics::from_samples(vec![]),
            Err(ReduceError::NoCurves)
        );
        assert_eq!(DrawdownStatistics::from_curves(&[]), Err(ReduceError::NoCurves));
    }

    #[test]
    fn ordering_and_extremes() {
        let stats = DrawdownStatistics::from_samples(vec![-0.10, -0.30, -0.05, -0.20]).unwrap();
        assert_eq!(stats.max_drawdown, -0.30);
        assert_eq!(stats.min_drawdown, -0.05);
        assert!((stats.avg_drawdown - (-0.1625)).abs() < 1e-12);
        assert!(stats.max_drawdown <= stats.avg_drawdown);
        assert!(stats.avg_drawdown <= stats.min_drawdown);
        assert_eq!(stats.sample_count, 4);
    }

    #[test]
    fn bands_step_down_by_sigma() {
        let stats = DrawdownStatistics::from_samples(vec![-0.10, -0.30, -0.05, -0.20]).unwrap();
        let [one, two, three] = stats.thresholds();
        assert!((stats.avg_drawdown - one - stats.std_deviation).abs() < 1e-12);
        assert!((one - two - stats.std_deviation).abs() < 1e-12);
        assert!((two - three - stats.std_deviation).abs() < 1e-12);
    }

    #[test]
    fn occurrence_counts_and_percentages() {
        // mean -0.1625, σ ≈ 0.0960 → 1σ band ≈ -0.2585: only -0.30 is beyond.
        let stats = DrawdownStatistics::from_samples(vec![-0.10, -0.30, -0.05, -0.20]).unwrap();
        assert_eq!(stats.occurrences_one_std.count, 1);
        assert!((stats.occurrences_one_std.percentage - 25.0).abs() < 1e-12);
        assert_eq!(stats.occurrences_two_std.count, 0);
        assert_eq!(stats.occurrences_three_std.count, 0);
    }

    #[test]
    fn zero_variance_has_zero_sigma() {
        let stats = DrawdownStatistics::from_samples(vec![-0.1; 10]).unwrap();
        assert_eq!(stats.std_deviation, 0.0);
        assert!(stats.avg_drawdown.is_finite());
        // Every sample sits on the collapsed threshold.
        assert_eq!(stats.occurrences_three_std.count, 10);
        assert!((stats.occurrences_three_std.percentage - 100.0).abs() < 1e-12);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = DrawdownStatistics::from_samples(vec![-0.3, -0.1, -0.2]).unwrap();
        let b = DrawdownStatistics::from_samples(vec![-0.1, -0.2, -0.3]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_curves_uses_one_sample_per_curve() {
        let curves = vec![
            EquityCurve::from(vec![100.0, 80.0, 120.0]),
            EquityCurve::from(vec![100.0, 110.0, 99.0]),
            EquityCurve::from(vec![100.0]),
        ];
        let stats = DrawdownStatistics::from_curves(&curves).unwrap();
        assert_eq!(stats.sample_count, 3);
        assert!((stats.max_drawdown - (-0.2)).abs() < 1e-12);
        assert_eq!(stats.min_drawdown, 0.0);
    }
}
