//! Multi-symbol scanning.
//!
//! Symbols fan out over a rayon pool. For each symbol the confluence
//! timeframes are fetched once and shared by every primary-timeframe
//! evaluation. Workers share the engine and provider by reference and
//! return owned reports, so no state is shared mutably.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use confluence_core::confluence::{TimeframeSet, CONFLUENCE_TIMEFRAMES};
use confluence_core::domain::{CandleWindow, Timeframe};
use confluence_core::engine::{Decision, MarketSnapshot, SignalEngine, SuppressReason};
use confluence_core::provider::{fetch_or_empty, CandleProvider};
use confluence_core::signal::Signal;

use crate::config::{DataSourceConfig, ScanConfig};
use crate::csv_provider::CsvCandleProvider;
use crate::synthetic::SyntheticProvider;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A primary timeframe that produced no signal, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suppression {
    pub timeframe: Timeframe,
    #[serde(flatten)]
    pub reason: SuppressReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub signals: Vec<Signal>,
    pub suppressed: Vec<Suppression>,
    /// Signals that passed every gate but exceeded the per-symbol cap.
    pub capped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanTotals {
    pub symbols: usize,
    pub evaluations: usize,
    pub signals: usize,
    pub suppressed: usize,
    pub capped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub symbols: Vec<SymbolReport>,
    pub totals: ScanTotals,
}

impl ScanReport {
    fn from_symbols(symbols: Vec<SymbolReport>) -> Self {
        let mut totals = ScanTotals {
            symbols: symbols.len(),
            ..ScanTotals::default()
        };
        for report in &symbols {
            totals.signals += report.signals.len();
            totals.suppressed += report.suppressed.len();
            totals.capped += report.capped;
            totals.evaluations += report.signals.len() + report.suppressed.len() + report.capped;
        }
        Self { symbols, totals }
    }

    /// Every emitted signal, in symbol order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.symbols.iter().flat_map(|s| s.signals.iter())
    }
}

pub struct Scanner {
    engine: SignalEngine,
    provider: Box<dyn CandleProvider>,
    timeframes: Vec<Timeframe>,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("engine", &self.engine)
            .field("provider", &self.provider.name())
            .field("timeframes", &self.timeframes)
            .field("workers", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .finish()
    }
}

impl Scanner {
    /// `workers == 0` runs on rayon's global pool.
    pub fn new(
        engine: SignalEngine,
        provider: Box<dyn CandleProvider>,
        timeframes: Vec<Timeframe>,
        workers: usize,
    ) -> Result<Self, ScanError> {
        let pool = if workers > 0 {
            Some(rayon::ThreadPoolBuilder::new().num_threads(workers).build()?)
        } else {
            None
        };
        Ok(Self {
            engine,
            provider,
            timeframes,
            pool,
        })
    }

    /// Build the engine and provider a validated config describes.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        let provider: Box<dyn CandleProvider> = match &config.data {
            DataSourceConfig::Csv { dir } => Box::new(CsvCandleProvider::new(dir)),
            DataSourceConfig::Synthetic { seed } => Box::new(SyntheticProvider::new(*seed)),
        };
        Self::new(
            SignalEngine::new(config.engine),
            provider,
            config.timeframes.clone(),
            config.workers,
        )
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    pub fn scan(&self, symbols: &[String]) -> ScanReport {
        info!(
            symbols = symbols.len(),
            timeframes = self.timeframes.len(),
            provider = self.provider.name(),
            "scan started"
        );

        let per_symbol = || -> Vec<SymbolReport> {
            symbols.par_iter().map(|s| self.scan_symbol(s)).collect()
        };
        let reports = match &self.pool {
            Some(pool) => pool.install(per_symbol),
            None => per_symbol(),
        };

        let report = ScanReport::from_symbols(reports);
        info!(
            signals = report.totals.signals,
            suppressed = report.totals.suppressed,
            capped = report.totals.capped,
            "scan finished"
        );
        report
    }

    /// Evaluate every primary timeframe for one symbol.
    pub fn scan_symbol(&self, symbol: &str) -> SymbolReport {
        let max_bars = self.engine.config().max_bars;
        let fetch = |tf| fetch_or_empty(self.provider.as_ref(), symbol, tf, max_bars);

        let timeframes = CONFLUENCE_TIMEFRAMES
            .iter()
            .fold(TimeframeSet::new(), |set, tf| set.with(fetch(*tf)));
        let mut snapshot =
            MarketSnapshot::new(symbol, CandleWindow::empty(symbol, Timeframe::H1), timeframes);

        let mut candidates: Vec<(usize, Signal)> = Vec::new();
        let mut suppressed = Vec::new();
        for (order, &tf) in self.timeframes.iter().enumerate() {
            snapshot.primary = match snapshot.timeframes.get(tf) {
                Some(window) => window.clone(),
                None => fetch(tf),
            };
            match self.engine.evaluate(&snapshot) {
                Decision::Emit { signal } => candidates.push((order, signal)),
                Decision::Suppress { suppressed: reason } => suppressed.push(Suppression {
                    timeframe: tf,
                    reason,
                }),
            }
        }

        let (signals, capped) =
            cap_signals(candidates, self.engine.config().risk.max_signals_per_symbol);
        debug!(symbol, signals = signals.len(), suppressed = suppressed.len(), capped, "symbol scanned");
        SymbolReport {
            symbol: symbol.to_string(),
            signals,
            suppressed,
            capped,
        }
    }
}

/// Keep the `max` most confident signals; ties go to the earlier configured timeframe.
fn cap_signals(mut candidates: Vec<(usize, Signal)>, max: usize) -> (Vec<Signal>, usize) {
    candidates.sort_by(|(ao, a), (bo, b)| {
        b.confidence()
            .total_cmp(&a.confidence())
            .then_with(|| ao.cmp(bo))
    });
    let capped = candidates.len().saturating_sub(max);
    candidates.truncate(max);
    (candidates.into_iter().map(|(_, s)| s).collect(), capped)
}
