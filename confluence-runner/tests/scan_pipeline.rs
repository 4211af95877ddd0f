//! End-to-end scans: config → provider → scanner → export.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use confluence_core::domain::{SignalSide, Timeframe};
use confluence_core::engine::SuppressReason;
use confluence_runner::{
    export_signals_csv, write_json, write_jsonl, ScanConfig, ScanReport, Scanner,
};

// ────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────

fn synthetic_config(symbols: &[&str], seed: u64, cap: usize) -> ScanConfig {
    let list = symbols
        .iter()
        .map(|s| format!("{s:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    ScanConfig::from_toml_str(&format!(
        r#"
        symbols = [{list}]
        timeframes = ["15m", "1h", "4h"]
        workers = 2

        [data]
        source = "synthetic"
        seed = {seed}

        [engine.risk]
        max_signals_per_symbol = {cap}
        "#
    ))
    .unwrap()
}

fn scan(config: &ScanConfig) -> ScanReport {
    Scanner::from_config(config).unwrap().scan(&config.symbols)
}

/// Steady hourly uptrend written as `<dir>/<symbol>_<tf>.csv`.
fn write_trend_csv(dir: &Path, symbol: &str, tf: Timeframe, bars: usize) {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let mut body = String::from("timestamp,open,high,low,close,volume\n");
    for i in 0..bars {
        let ts = base + Duration::minutes(tf.minutes() * i as i64);
        let open = 100.0 + i as f64 * 0.5;
        let close = open + 0.4;
        writeln!(
            body,
            "{},{open},{},{},{close},1000",
            ts.to_rfc3339(),
            close + 0.2,
            open - 0.2
        )
        .unwrap();
    }
    std::fs::write(dir.join(format!("{symbol}_{}.csv", tf.label())), body).unwrap();
}

// ────────────────────────────────────────────────────────────────────
// Synthetic scans
// ────────────────────────────────────────────────────────────────────

#[test]
fn synthetic_scan_is_deterministic() {
    let config = synthetic_config(&["BTC-USD", "ETH-USD", "SOL-USD"], 42, 1);
    assert_eq!(scan(&config), scan(&config));
}

#[test]
fn totals_account_for_every_evaluation() {
    let symbols = ["A", "B", "C", "D", "E", "F"];
    let config = synthetic_config(&symbols, 7, 1);
    let report = scan(&config);

    assert_eq!(report.totals.symbols, symbols.len());
    assert_eq!(report.totals.evaluations, symbols.len() * 3);
    assert_eq!(
        report.totals.signals + report.totals.suppressed + report.totals.capped,
        report.totals.evaluations
    );
    let names: Vec<&str> = report.symbols.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(names, symbols);
}

#[test]
fn emitted_signals_respect_cap_and_levels() {
    let symbols: Vec<String> = (0..12).map(|i| format!("SYM{i}")).collect();
    let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
    for cap in [1, 2] {
        let config = synthetic_config(&refs, 3, cap);
        let report = scan(&config);
        for symbol in &report.symbols {
            assert!(symbol.signals.len() <= cap);
            if symbol.capped > 0 {
                assert_eq!(symbol.signals.len(), cap);
            }
            for pair in symbol.signals.windows(2) {
                assert!(pair[0].confidence() >= pair[1].confidence());
            }
        }
        for signal in report.signals() {
            let entry = signal.entry_price();
            match signal.direction() {
                SignalSide::Buy => assert!(signal.stop_loss() < entry && entry < signal.take_profit()),
                SignalSide::Sell => assert!(signal.take_profit() < entry && entry < signal.stop_loss()),
            }
            assert!(signal.risk_reward() >= config.engine.risk.min_risk_reward);
            assert!(signal.confidence() >= config.engine.thresholds.min_confidence);
        }
    }
}

// ────────────────────────────────────────────────────────────────────
// CSV scans
// ────────────────────────────────────────────────────────────────────

#[test]
fn csv_scan_reads_files_and_reports_missing_ones() {
    let dir = tempfile::tempdir().unwrap();
    write_trend_csv(dir.path(), "BTC", Timeframe::H1, 60);
    write_trend_csv(dir.path(), "BTC", Timeframe::D1, 60);

    let config = ScanConfig::from_toml_str(&format!(
        r#"
        symbols = ["BTC"]
        timeframes = ["1h", "4h"]
        [data]
        source = "csv"
        dir = {:?}
        "#,
        dir.path().display().to_string()
    ))
    .unwrap();
    let report = scan(&config);
    let btc = &report.symbols[0];

    // 4h has no file: insufficient data, not an error.
    let h4 = btc
        .suppressed
        .iter()
        .find(|s| s.timeframe == Timeframe::H4)
        .unwrap();
    assert_eq!(
        h4.reason,
        SuppressReason::InsufficientData {
            bars: 0,
            required: 15
        }
    );
    // 1h was read and evaluated past the data guard.
    assert!(btc.suppressed.iter().all(|s| s.timeframe != Timeframe::H1
        || !matches!(s.reason, SuppressReason::InsufficientData { .. })));
    assert_eq!(report.totals.evaluations, 2);
}

// ────────────────────────────────────────────────────────────────────
// Export
// ────────────────────────────────────────────────────────────────────

#[test]
fn exports_match_report() {
    let config = synthetic_config(&["A", "B", "C", "D", "E", "F", "G", "H"], 11, 2);
    let report = scan(&config);
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("report.json");
    write_json(&report, &json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["totals"]["signals"], report.totals.signals);
    assert_eq!(json["symbols"].as_array().unwrap().len(), 8);

    let jsonl_path = dir.path().join("signals.jsonl");
    let written = write_jsonl(report.signals(), &jsonl_path).unwrap();
    assert_eq!(written, report.totals.signals);
    let lines = std::fs::read_to_string(&jsonl_path).unwrap();
    assert_eq!(lines.lines().count(), written);
    for line in lines.lines() {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(v["direction"] == "BUY" || v["direction"] == "SELL");
    }

    let csv = export_signals_csv(report.signals()).unwrap();
    assert_eq!(csv.lines().count(), written + 1);
}
