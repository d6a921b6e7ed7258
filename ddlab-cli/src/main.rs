//! DDLab CLI — drawdown Monte Carlo over an account-history export.
//!
//! Commands:
//! - `run` — resample the extracted trades and print drawdown, stagnation and risk figures
//! - `trades` — list the trades extracted from a history file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ddlab_core::data::{parse_trade_data, TIMESTAMP_FORMAT};
use ddlab_core::engine::extract_trades;
use ddlab_runner::export::{export_trades_csv, generate_summary, save_artifacts};
use ddlab_runner::runner::run_analysis;
use ddlab_runner::AnalysisConfig;

#[derive(Parser)]
#[command(
    name = "ddlab",
    about = "DDLab CLI — Monte Carlo drawdown analysis of trading account history"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis on a history file.
    Run {
        /// Tab-separated balance/equity history (<DATE> <BALANCE> <EQUITY> <DEPOSIT LOAD>).
        #[arg(long)]
        input: PathBuf,

        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of simulated curves (overrides the config).
        #[arg(long)]
        simulations: Option<usize>,

        /// Master seed (overrides the config). Random when unset.
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads (overrides the config).
        #[arg(long)]
        threads: Option<usize>,

        /// Write report.json, trades.csv and curves.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the trades extracted from a history file.
    Trades {
        #[arg(long)]
        input: PathBuf,

        /// Emit CSV instead of a table.
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ddlab=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            config,
            simulations,
            seed,
            threads,
            output_dir,
        } => run_cmd(
            &input,
            config.as_deref(),
            Overrides {
                simulations,
                seed,
                threads,
            },
            output_dir.as_deref(),
        ),
        Commands::Trades { input, csv } => trades_cmd(&input, csv),
    }
}

/// Command-line values that take precedence over the config file.
struct Overrides {
    simulations: Option<usize>,
    seed: Option<u64>,
    threads: Option<usize>,
}

fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(n) = overrides.simulations {
        config.simulation.n_simulations = n;
    }
    if let Some(seed) = overrides.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(threads) = overrides.threads {
        config.simulation.threads = threads;
    }
    config.validate()?;
    Ok(config)
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_cmd(
    input: &Path,
    config_path: Option<&Path>,
    overrides: Overrides,
    output_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let raw = read_input(input)?;

    let report = run_analysis(&raw, &config, None)
        .with_context(|| format!("analysis of {} failed", input.display()))?;

    print!("{}", generate_summary(&report));

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&report, dir)?;
        println!("\nArtifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn trades_cmd(input: &Path, csv: bool) -> Result<()> {
    let raw = read_input(input)?;
    let points = parse_trade_data(&raw)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let trades = extract_trades(&points);

    if csv {
        print!("{}", export_trades_csv(&trades)?);
        return Ok(());
    }

    println!(
        "{:<4} {:<17} {:<17} {:>12} {:>10}",
        "#", "entry", "exit", "profit", "minutes"
    );
    for (i, t) in trades.iter().enumerate() {
        println!(
            "{:<4} {:<17} {:<17} {:>12.2} {:>10}",
            i + 1,
            t.entry_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            t.exit_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            t.profit,
            t.duration_minutes
        );
    }
    let net: f64 = trades.iter().map(|t| t.profit).sum();
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    println!(
        "\n{} trades, {} winners, net {:.2}",
        trades.len(),
        winners,
        net
    );
    Ok(())
}
