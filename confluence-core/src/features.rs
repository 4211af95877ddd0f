//! One-pass extraction of the indicator values scoring needs.
//!
//! Everything downstream of this module works on [`MarketFeatures`] rather
//! than raw candles, so decisions can be reasoned about (and tested) from a
//! handful of numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CandleWindow, Direction};
use crate::indicators::{atr, rsi, sma, volume_ratio};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub atr_period: usize,
    pub rsi_period: usize,
    /// Bars averaged for the confidence volume ratio.
    pub volume_period: usize,
    /// Long trend filter period.
    pub trend_sma_period: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            rsi_period: 14,
            volume_period: 20,
            trend_sma_period: 200,
        }
    }
}

/// Indicator snapshot at the last candle of the primary window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketFeatures {
    /// Close of the last candle; the entry price.
    pub close: f64,
    /// 0.0 when there is no usable volatility.
    pub atr: f64,
    pub rsi: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub sma_trend: Option<f64>,
    /// Direction of the last three closes (strictly rising or falling), else Neutral.
    pub close_trend: Direction,
    /// Timestamp of the last candle. Sessions and signal timestamps use it.
    pub evaluated_at: DateTime<Utc>,
    pub bar_count: usize,
}

/// Direction of the last three closes.
pub fn close_trend(window: &CandleWindow) -> Direction {
    let tail = window.tail(3);
    if tail.len() < 3 {
        return Direction::Neutral;
    }
    if tail.windows(2).all(|p| p[1].close > p[0].close) {
        Direction::Bullish
    } else if tail.windows(2).all(|p| p[1].close < p[0].close) {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}

/// Extract features from the primary window. `None` for an empty window.
pub fn extract(window: &CandleWindow, config: &FeatureConfig) -> Option<MarketFeatures> {
    let last = window.last()?;
    let candles = window.candles();
    Some(MarketFeatures {
        close: last.close,
        atr: atr(candles, config.atr_period),
        rsi: rsi(candles, config.rsi_period),
        volume_ratio: volume_ratio(candles, config.volume_period),
        sma_trend: sma(candles, config.trend_sma_period),
        close_trend: close_trend(window),
        evaluated_at: last.timestamp,
        bar_count: window.len(),
    })
}
