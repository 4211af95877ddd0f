//! Criterion benchmarks for the evaluation hot paths.
//!
//! Benchmarks:
//! 1. Full engine evaluation (primary window plus confluence set)
//! 2. Pattern detection across all detectors
//! 3. Indicator series (ATR, RSI, SMA)

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use confluence_core::confluence::{TimeframeSet, CONFLUENCE_TIMEFRAMES};
use confluence_core::domain::{Candle, CandleWindow, Timeframe};
use confluence_core::engine::{MarketSnapshot, SignalEngine};
use confluence_core::indicators::{Atr, Indicator, Rsi, Sma};
use confluence_core::patterns::{default_detectors, detect_all};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_window(tf: Timeframe, n: usize) -> CandleWindow {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let candles = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            Candle::new(
                base + Duration::minutes(tf.minutes() * i as i64),
                open,
                close + 1.5,
                close - 1.5,
                close,
                1_000.0 + (i % 500) as f64,
            )
        })
        .collect();
    CandleWindow::new("BENCH", tf, candles).unwrap()
}

fn make_snapshot(n: usize) -> MarketSnapshot {
    let set = CONFLUENCE_TIMEFRAMES
        .iter()
        .fold(TimeframeSet::new(), |set, tf| set.with(make_window(*tf, n)));
    MarketSnapshot::new("BENCH", make_window(Timeframe::H1, n), set)
}

// ── 1. Engine ────────────────────────────────────────────────────────

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_evaluate");
    let engine = SignalEngine::default();

    for bar_count in [100, 500] {
        let snapshot = make_snapshot(bar_count);
        group.bench_with_input(
            BenchmarkId::new("five_timeframes", bar_count),
            &snapshot,
            |b, snapshot| b.iter(|| black_box(engine.evaluate(black_box(snapshot)))),
        );
    }
    group.finish();
}

// ── 2. Patterns ──────────────────────────────────────────────────────

fn bench_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_detection");
    let detectors = default_detectors();

    for bar_count in [50, 500] {
        let window = make_window(Timeframe::M15, bar_count);
        group.bench_with_input(
            BenchmarkId::new("all_detectors", bar_count),
            &window,
            |b, window| b.iter(|| black_box(detect_all(&detectors, black_box(window)))),
        );
    }
    group.finish();
}

// ── 3. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_series");
    let window = make_window(Timeframe::H1, 500);
    let candles = window.candles();

    group.bench_function("atr_14", |b| {
        let atr = Atr::new(14);
        b.iter(|| black_box(atr.compute(black_box(candles))))
    });
    group.bench_function("rsi_14", |b| {
        let rsi = Rsi::new(14);
        b.iter(|| black_box(rsi.compute(black_box(candles))))
    });
    group.bench_function("sma_200", |b| {
        let sma = Sma::new(200);
        b.iter(|| black_box(sma.compute(black_box(candles))))
    });
    group.finish();
}

criterion_group!(benches, bench_engine, bench_patterns, bench_indicators);
criterion_main!(benches);
