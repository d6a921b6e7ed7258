//! Criterion benchmarks for DDLab hot paths.
//!
//! Benchmarks:
//! 1. History parsing (tab-separated log, 10k lines)
//! 2. Trade extraction over a parsed log
//! 3. Trade-order resampling, serial vs. rayon pool

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ddlab_core::data::parse_trade_data;
use ddlab_core::domain::{TimeSeriesPoint, Trade};
use ddlab_core::engine::{extract_trades, run_simulations, SimulationConfig};
use ddlab_core::rng::RngHierarchy;

// ── Helpers ──────────────────────────────────────────────────────────

/// Alternating flat / open snapshots: one trade every three lines.
fn make_points(n: usize) -> Vec<TimeSeriesPoint> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut balance = 10_000.0;
    (0..n)
        .map(|i| {
            let open = i % 3 != 0;
            if i % 3 == 0 {
                balance += (i as f64 * 0.7).sin() * 50.0;
            }
            TimeSeriesPoint {
                timestamp: start + Duration::minutes(15 * i as i64),
                balance,
                equity: if open { balance + 5.0 } else { balance },
                deposit_load: 0.0,
            }
        })
        .collect()
}

fn make_log(n: usize) -> String {
    let mut out = String::from("<DATE>\t<BALANCE>\t<EQUITY>\t<DEPOSIT LOAD>\n");
    for p in make_points(n) {
        out.push_str(&format!(
            "{}\t{:.2}\t{:.2}\t{:.4}\n",
            p.timestamp.format("%Y.%m.%d %H:%M"),
            p.balance,
            p.equity,
            p.deposit_load
        ));
    }
    out
}

fn make_trades(n: usize) -> Vec<Trade> {
    extract_trades(&make_points(n * 3 + 1))
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let log = make_log(10_000);
    c.bench_function("parse_10k_lines", |b| {
        b.iter(|| black_box(parse_trade_data(black_box(&log))))
    });
}

fn bench_extract(c: &mut Criterion) {
    let points = make_points(10_000);
    c.bench_function("extract_10k_points", |b| {
        b.iter(|| black_box(extract_trades(black_box(&points))))
    });
}

fn bench_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulations_1000x500_trades");
    let trades = make_trades(500);
    let rng = RngHierarchy::new(42);

    for threads in [1usize, 4] {
        let config = SimulationConfig {
            n_simulations: 1000,
            threads,
            ..SimulationConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, cfg| {
            b.iter(|| black_box(run_simulations(&trades, cfg, &rng, None)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_extract, bench_simulations);
criterion_main!(benches);
