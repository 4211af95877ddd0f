//! CandleWindow: an ordered, bounded candle sequence for one (symbol, timeframe).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Candle, Timeframe};

/// Contract violations when constructing a window.
///
/// These describe malformed input shape, never a market condition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WindowError {
    #[error("candles out of order at index {index}: timestamps must be strictly ascending")]
    OutOfOrder { index: usize },

    #[error("duplicate timestamp at index {index}")]
    DuplicateTimestamp { index: usize },

    #[error("candle at index {index} has a NaN price field")]
    VoidCandle { index: usize },
}

/// Ordered candles for one `(symbol, timeframe)` pair.
///
/// Timestamps are strictly ascending. The candle buffer is private so a
/// window cannot be mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleWindow {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleWindow {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> Result<Self, WindowError> {
        for (index, candle) in candles.iter().enumerate() {
            if candle.is_void() {
                return Err(WindowError::VoidCandle { index });
            }
            if index > 0 {
                let prev = candles[index - 1].timestamp;
                if candle.timestamp == prev {
                    return Err(WindowError::DuplicateTimestamp { index });
                }
                if candle.timestamp < prev {
                    return Err(WindowError::OutOfOrder { index });
                }
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            candles,
        })
    }

    /// The "insufficient data" window.
    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            candles: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// The last `n` candles (or all of them if the window is shorter).
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Keep only the most recent `max_len` candles.
    pub fn truncated(mut self, max_len: usize) -> Self {
        if self.candles.len() > max_len {
            let excess = self.candles.len() - max_len;
            self.candles.drain(..excess);
        }
        self
    }
}
