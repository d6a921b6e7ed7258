//! Reporting and export — JSON, CSV and plain-text summaries.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: extracted trades and simulated curves for external tools
//! - **Text**: the console summary printed by the CLI
//!
//! Persisted reports carry a `schema_version`. Newer versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ddlab_core::data::TIMESTAMP_FORMAT;
use ddlab_core::domain::{EquityCurve, Trade};

use crate::runner::{AnalysisReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisReport` to pretty JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Deserialize an `AnalysisReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: entry_time, exit_time, profit, duration_minutes.
/// Timestamps use the history-file format (`2021.01.04 09:30`).
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["entry_time", "exit_time", "profit", "duration_minutes"])?;

    for t in trades {
        wtr.write_record([
            &t.entry_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &t.exit_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.2}", t.profit),
            &t.duration_minutes.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Long-format curves: one row per point, columns simulation, index, value.
pub fn export_curves_csv(curves: &[EquityCurve]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["simulation", "index", "value"])?;
    for (sim, curve) in curves.iter().enumerate() {
        for (i, value) in curve.points() {
            wtr.write_record([&sim.to_string(), &i.to_string(), &format!("{:.2}", value)])?;
        }
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one analysis run.
///
/// Creates a directory named `analysis_{seed}_{timestamp}/` under
/// `output_dir` containing:
/// - `report.json` — the full `AnalysisReport`
/// - `trades.csv` — extracted historical trades
/// - `curves.csv` — every simulated equity curve
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &AnalysisReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "analysis_{}_{}",
        report.seed,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    std::fs::write(run_dir.join("report.json"), &json)
        .with_context(|| format!("failed to write report.json in {}", run_dir.display()))?;

    let trades_csv = export_trades_csv(&report.trades)?;
    std::fs::write(run_dir.join("trades.csv"), &trades_csv)
        .with_context(|| format!("failed to write trades.csv in {}", run_dir.display()))?;

    let curves_csv = export_curves_csv(&report.curves)?;
    std::fs::write(run_dir.join("curves.csv"), &curves_csv)
        .with_context(|| format!("failed to write curves.csv in {}", run_dir.display()))?;

    tracing::info!(dir = %run_dir.display(), "saved analysis artifacts");
    Ok(run_dir)
}

/// Load an `AnalysisReport` from an artifact directory's report.json.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Text summary ───────────────────────────────────────────────────

/// Plain-text summary of a report for the console.
pub fn generate_summary(report: &AnalysisReport) -> String {
    let d = &report.drawdown;
    let s = &report.stagnation;
    let r = &report.risk;
    let m = &report.monthly;
    let p = &report.periods;

    let mut out = String::with_capacity(1024);
    out.push_str("Drawdown Monte Carlo\n");
    out.push_str(&format!(
        "  trades {}  simulations {}  seed {}  start balance {:.2}\n\n",
        report.trade_count(),
        report.n_simulations,
        report.seed,
        report.starting_balance
    ));

    out.push_str("Drawdown\n");
    out.push_str(&format!("  worst          {:>8.2}%\n", d.max_drawdown * 100.0));
    out.push_str(&format!("  average        {:>8.2}%\n", d.avg_drawdown * 100.0));
    out.push_str(&format!("  mildest        {:>8.2}%\n", d.min_drawdown * 100.0));
    out.push_str(&format!("  std deviation  {:>8.2}%\n", d.std_deviation * 100.0));
    let bands = [
        (1, d.avg_plus_one_std, d.occurrences_one_std),
        (2, d.avg_plus_two_std, d.occurrences_two_std),
        (3, d.avg_plus_three_std, d.occurrences_three_std),
    ];
    for (k, threshold, occ) in bands {
        out.push_str(&format!(
            "  avg - {k}σ       {:>8.2}%  ({} curves, {:.1}%)\n",
            threshold * 100.0,
            occ.count,
            occ.percentage
        ));
    }

    out.push_str("\nStagnation (trades without a new high)\n");
    out.push_str(&format!(
        "  best {}  average {}  worst {}\n",
        s.best, s.average, s.worst
    ));

    out.push_str("\nRisk\n");
    out.push_str(&format!("  worst loss           {:.2}\n", r.worst_loss));
    out.push_str(&format!("  recommended capital  {:.2}\n", r.recommended_capital));
    out.push_str(&format!(
        "  monthly return       {:.2}% (on {:.2}/month)\n",
        r.monthly_return_percentage, r.period_profit
    ));
    out.push_str(&format!("  risk of ruin         {:.2}%\n", r.risk_of_ruin));

    out.push_str("\nMonths\n");
    out.push_str(&format!(
        "  best {:.2}  average {:.2}  worst {:.2}\n",
        m.best, m.average, m.worst
    ));
    out.push_str(&format!(
        "  negative: months {} ({:.1}%)  quarters {} ({:.1}%)  semesters {} ({:.1}%)  years {} ({:.1}%)\n",
        p.negative_months.count,
        p.negative_months.percentage,
        p.negative_quarters.count,
        p.negative_quarters.percentage,
        p.negative_semesters.count,
        p.negative_semesters.percentage,
        p.negative_years.count,
        p.negative_years.percentage
    ));
    out
}
