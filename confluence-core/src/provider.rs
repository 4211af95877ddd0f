//! Candle provider trait and structured error types.
//!
//! The engine never fetches data itself. Providers (CSV files, synthetic
//! generators, in-memory fixtures, live feeds) sit behind [`CandleProvider`],
//! and any failure they report reaches the engine as an empty window:
//! "insufficient data", not an error.

use thiserror::Error;
use tracing::warn;

use crate::domain::{CandleWindow, Timeframe, WindowError};

/// Structured error types for candle fetching.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no data for {symbol} {timeframe}")]
    NotFound { symbol: String, timeframe: Timeframe },

    #[error("could not parse {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid candle window: {0}")]
    InvalidWindow(#[from] WindowError),

    #[error("provider error: {0}")]
    Other(String),
}

/// A source of candle windows.
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch up to `max_bars` of the most recent candles for `(symbol, timeframe)`.
    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        max_bars: usize,
    ) -> Result<CandleWindow, ProviderError>;
}

/// Fetch, turning any provider error into an empty window.
pub fn fetch_or_empty(
    provider: &dyn CandleProvider,
    symbol: &str,
    timeframe: Timeframe,
    max_bars: usize,
) -> CandleWindow {
    match provider.fetch(symbol, timeframe, max_bars) {
        Ok(window) => window,
        Err(e) => {
            warn!(
                provider = provider.name(),
                symbol,
                timeframe = %timeframe,
                error = %e,
                "candle fetch failed, treating as insufficient data"
            );
            CandleWindow::empty(symbol, timeframe)
        }
    }
}
