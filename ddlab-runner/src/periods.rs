//! Calendar-period returns of the historical log.
//!
//! A day's return is its closing balance minus the previous day's closing
//! balance; the first day is measured from its own opening balance. Daily
//! returns therefore add up to the net balance change of the whole log.
//! Days are then summed into months, quarters, half-years and years, keyed
//! `YYYY-MM`, `YYYY-Qn`, `YYYY-Hn` and `YYYY`.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use ddlab_core::domain::TimeSeriesPoint;

use crate::metrics::{mean_f64, Occurrence};

/// Per-day balance change, ordered by date.
pub fn daily_returns(points: &[TimeSeriesPoint]) -> BTreeMap<NaiveDate, f64> {
    let mut ordered: Vec<&TimeSeriesPoint> = points.iter().collect();
    ordered.sort_by_key(|p| p.timestamp);
    let Some(first) = ordered.first() else {
        return BTreeMap::new();
    };

    // Later points overwrite earlier ones: each entry ends as the day's close.
    let mut closes: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in &ordered {
        closes.insert(point.timestamp.date(), point.balance);
    }

    let mut previous_close = first.balance;
    closes
        .into_iter()
        .map(|(date, close)| {
            let ret = close - previous_close;
            previous_close = close;
            (date, ret)
        })
        .collect()
}

/// Summed returns per calendar period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturns {
    pub monthly: BTreeMap<String, f64>,
    pub quarterly: BTreeMap<String, f64>,
    pub semiannual: BTreeMap<String, f64>,
    pub annual: BTreeMap<String, f64>,
}

pub fn group_returns(daily: &BTreeMap<NaiveDate, f64>) -> PeriodReturns {
    let mut out = PeriodReturns::default();
    for (date, &ret) in daily {
        let year = date.year();
        let month = date.month();
        let quarter = (month - 1) / 3 + 1;
        let half = if month <= 6 { 1 } else { 2 };

        *out.monthly.entry(format!("{year}-{month:02}")).or_default() += ret;
        *out.quarterly.entry(format!("{year}-Q{quarter}")).or_default() += ret;
        *out.semiannual.entry(format!("{year}-H{half}")).or_default() += ret;
        *out.annual.entry(format!("{year}")).or_default() += ret;
    }
    out
}

/// Best, average and worst month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub best: f64,
    pub average: f64,
    pub worst: f64,
}

impl MonthlyStats {
    pub fn from_returns(monthly: &BTreeMap<String, f64>) -> Self {
        if monthly.is_empty() {
            return Self::default();
        }
        let values: Vec<f64> = monthly.values().copied().collect();
        Self {
            best: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            average: mean_f64(&values),
            worst: values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// How many periods of each length closed with a loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodAnalysis {
    pub negative_months: Occurrence,
    pub negative_quarters: Occurrence,
    pub negative_semesters: Occurrence,
    pub negative_years: Occurrence,
}

impl PeriodAnalysis {
    pub fn from_returns(returns: &PeriodReturns) -> Self {
        Self {
            negative_months: negatives(&returns.monthly),
            negative_quarters: negatives(&returns.quarterly),
            negative_semesters: negatives(&returns.semiannual),
            negative_years: negatives(&returns.annual),
        }
    }
}

fn negatives(periods: &BTreeMap<String, f64>) -> Occurrence {
    let count = periods.values().filter(|&&v| v < 0.0).count();
    Occurrence::new(count, periods.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(ts: &str, balance: f64) -> TimeSeriesPoint {
        TimeSeriesPoint {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y.%m.%d %H:%M").unwrap(),
            balance,
            equity: balance,
            deposit_load: 0.0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_close_to_close() {
        let points = vec![
            at("2020.04.15 00:00", 10_000.0),
            at("2020.04.15 12:00", 10_050.0),
            at("2020.04.15 23:00", 10_120.0),
            at("2020.04.16 09:00", 10_120.0),
            at("2020.04.16 17:00", 10_020.0),
        ];
        let daily = daily_returns(&points);
        assert_eq!(daily.len(), 2);
        assert!((daily[&date(2020, 4, 15)] - 120.0).abs() < 1e-9);
        assert!((daily[&date(2020, 4, 16)] - (-100.0)).abs() < 1e-9);
    }

    #[test]
    fn daily_orders_points_within_a_day() {
        let points = vec![at("2020.04.15 18:00", 10_200.0), at("2020.04.15 08:00", 10_000.0)];
        let daily = daily_returns(&points);
        assert!((daily[&date(2020, 4, 15)] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn overnight_change_lands_on_the_closing_day() {
        let points = vec![
            at("2020.04.15 22:00", 10_000.0),
            at("2020.04.16 01:00", 10_100.0),
            at("2020.04.17 09:00", 10_050.0),
        ];
        let daily = daily_returns(&points);
        assert_eq!(daily[&date(2020, 4, 15)], 0.0);
        assert!((daily[&date(2020, 4, 16)] - 100.0).abs() < 1e-9);
        assert!((daily[&date(2020, 4, 17)] - (-50.0)).abs() < 1e-9);
        let total: f64 = daily.values().sum();
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_day_is_flat() {
        let daily = daily_returns(&[at("2021.01.04 10:00", 5_000.0)]);
        assert_eq!(daily[&date(2021, 1, 4)], 0.0);
    }

    #[test]
    fn empty_input() {
        assert!(daily_returns(&[]).is_empty());
        let grouped = group_returns(&BTreeMap::new());
        assert_eq!(grouped, PeriodReturns::default());
        assert_eq!(MonthlyStats::from_returns(&grouped.monthly), MonthlyStats::default());
        assert_eq!(PeriodAnalysis::from_returns(&grouped), PeriodAnalysis::default());
    }

    #[test]
    fn grouping_keys_and_sums() {
        let daily: BTreeMap<NaiveDate, f64> = [
            (date(2020, 1, 2), 100.0),
            (date(2020, 1, 3), -40.0),
            (date(2020, 3, 31), 10.0),
            (date(2020, 4, 1), -200.0),
            (date(2020, 7, 1), 50.0),
            (date(2021, 12, 31), 5.0),
        ]
        .into_iter()
        .collect();
        let g = group_returns(&daily);

        assert!((g.monthly["2020-01"] - 60.0).abs() < 1e-9);
        assert!((g.monthly["2020-03"] - 10.0).abs() < 1e-9);
        assert!((g.quarterly["2020-Q1"] - 70.0).abs() < 1e-9);
        assert!((g.quarterly["2020-Q2"] - (-200.0)).abs() < 1e-9);
        assert!((g.quarterly["2020-Q3"] - 50.0).abs() < 1e-9);
        assert!((g.quarterly["2021-Q4"] - 5.0).abs() < 1e-9);
        assert!((g.semiannual["2020-H1"] - (-130.0)).abs() < 1e-9);
        assert!((g.semiannual["2020-H2"] - 50.0).abs() < 1e-9);
        assert!((g.annual["2020"] - (-80.0)).abs() < 1e-9);
        assert!((g.annual["2021"] - 5.0).abs() < 1e-9);
        assert_eq!(g.monthly.len(), 5);
    }

    #[test]
    fn monthly_stats() {
        let monthly: BTreeMap<String, f64> = [
            ("2020-01".to_string(), 300.0),
            ("2020-02".to_string(), -120.0),
            ("2020-03".to_string(), 60.0),
        ]
        .into_iter()
        .collect();
        let stats = MonthlyStats::from_returns(&monthly);
        assert_eq!(stats.best, 300.0);
        assert_eq!(stats.worst, -120.0);
        assert!((stats.average - 80.0).abs() < 1e-9);
    }

    #[test]
    fn negative_period_counts() {
        let daily: BTreeMap<NaiveDate, f64> = [
            (date(2020, 1, 2), -10.0),
            (date(2020, 2, 3), 30.0),
            (date(2020, 5, 4), -5.0),
            (date(2020, 8, 5), 1.0),
        ]
        .into_iter()
        .collect();
        let analysis = PeriodAnalysis::from_returns(&group_returns(&daily));

        assert_eq!(analysis.negative_months.count, 2);
        assert!((analysis.negative_months.percentage - 50.0).abs() < 1e-9);
        // Q1 +20, Q2 -5, Q3 +1
        assert_eq!(analysis.negative_quarters.count, 1);
        assert!((analysis.negative_quarters.percentage - 100.0 / 3.0).abs() < 1e-9);
        // H1 +15, H2 +1
        assert_eq!(analysis.negative_semesters.count, 0);
        assert_eq!(analysis.negative_years.count, 0);
        assert_eq!(analysis.negative_years.percentage, 0.0);
    }
}
