//! Confluence CLI — scan, analyze and session commands.
//!
//! Commands:
//! - `scan`: run a multi-symbol scan from a TOML config file
//! - `analyze`: evaluate one symbol on one timeframe and print the decision
//! - `sessions`: show the kill-zone analysis for a moment in time
//!
//! Logs go to stderr (filter with `RUST_LOG`); results go to stdout.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use confluence_core::confluence::{TimeframeSet, CONFLUENCE_TIMEFRAMES};
use confluence_core::domain::Timeframe;
use confluence_core::engine::{EngineConfig, MarketSnapshot, SignalEngine};
use confluence_core::provider::{fetch_or_empty, CandleProvider};
use confluence_core::session::{self, KillZone};
use confluence_runner::{
    export_json, write_json, write_jsonl, CsvCandleProvider, ScanConfig, Scanner,
    SyntheticProvider,
};

#[derive(Parser)]
#[command(
    name = "confluence",
    about = "Confluence — multi-timeframe pattern signal engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every configured symbol and timeframe.
    Scan {
        /// Path to a TOML scan config.
        #[arg(long)]
        config: PathBuf,

        /// Write the report here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// With --out, write one signal per line instead of the full report.
        #[arg(long, default_value_t = false)]
        jsonl: bool,
    },
    /// Evaluate one symbol on one primary timeframe.
    Analyze {
        #[arg(long)]
        symbol: String,

        /// Primary timeframe (1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w).
        #[arg(long, default_value = "1h")]
        timeframe: Timeframe,

        /// Directory of `<SYMBOL>_<tf>.csv` files.
        #[arg(long, conflicts_with = "synthetic")]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic candles.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Account balance used for position sizing.
        #[arg(long)]
        balance: Option<f64>,
    },
    /// Show the active kill zone for a time (default: now).
    Sessions {
        /// RFC 3339 timestamp, e.g. 2024-01-02T14:00:00Z.
        #[arg(long)]
        at: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confluence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { config, out, jsonl } => run_scan(config, out, jsonl),
        Commands::Analyze {
            symbol,
            timeframe,
            data_dir,
            synthetic,
            seed,
            balance,
        } => run_analyze(&symbol, timeframe, data_dir, synthetic, seed, balance),
        Commands::Sessions { at } => run_sessions(at.as_deref()),
    }
}

fn run_scan(config_path: PathBuf, out: Option<PathBuf>, jsonl: bool) -> Result<()> {
    let config = ScanConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let scanner = Scanner::from_config(&config)?;
    let report = scanner.scan(&config.symbols);

    match out {
        Some(path) if jsonl => {
            let written = write_jsonl(report.signals(), &path)?;
            info!(path = %path.display(), signals = written, "signals written");
        }
        Some(path) => {
            write_json(&report, &path)?;
            info!(path = %path.display(), "report written");
        }
        None if jsonl => bail!("--jsonl requires --out"),
        None => println!("{}", export_json(&report)?),
    }

    eprintln!(
        "{} symbols, {} evaluations: {} signals, {} suppressed, {} over cap",
        report.totals.symbols,
        report.totals.evaluations,
        report.totals.signals,
        report.totals.suppressed,
        report.totals.capped
    );
    Ok(())
}

fn run_analyze(
    symbol: &str,
    timeframe: Timeframe,
    data_dir: Option<PathBuf>,
    synthetic: bool,
    seed: u64,
    balance: Option<f64>,
) -> Result<()> {
    let provider: Box<dyn CandleProvider> = match (data_dir, synthetic) {
        (Some(dir), false) => Box::new(CsvCandleProvider::new(dir)),
        (None, true) => Box::new(SyntheticProvider::new(seed)),
        _ => bail!("one of --data-dir or --synthetic is required"),
    };

    let mut config = EngineConfig::default();
    if let Some(balance) = balance {
        config.risk.account_balance = balance;
    }
    config.validate()?;
    let engine = SignalEngine::new(config);

    let fetch = |tf| fetch_or_empty(provider.as_ref(), symbol, tf, config.max_bars);
    let timeframes = CONFLUENCE_TIMEFRAMES
        .iter()
        .fold(TimeframeSet::new(), |set, tf| set.with(fetch(*tf)));
    let primary = match timeframes.get(timeframe) {
        Some(window) => window.clone(),
        None => fetch(timeframe),
    };

    let decision = engine.evaluate(&MarketSnapshot::new(symbol, primary, timeframes));
    println!("{}", serde_json::to_string_pretty(&decision)?);
    if let Some(signal) = decision.signal() {
        eprintln!("{signal}");
    }
    Ok(())
}

fn run_sessions(at: Option<&str>) -> Result<()> {
    let at = match at {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid timestamp '{s}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let analysis = session::analyze(at);

    let zones: Vec<_> = KillZone::ALL
        .iter()
        .map(|zone| {
            let (start, end) = zone.window();
            json!({
                "zone": zone.label(),
                "start_utc": format!("{:02}:{:02}", start / 60, start % 60),
                "end_utc": format!("{:02}:{:02}", end / 60, end % 60),
                "strength": zone.strength(),
            })
        })
        .collect();

    let output = json!({
        "at": at.to_rfc3339(),
        "analysis": analysis,
        "kill_zones": zones,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
