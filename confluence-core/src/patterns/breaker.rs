//! Breaker Block: a broken key level retested from the other side.
//!
//! Key levels are the high and low of the bars before the recent segment.
//! Bullish: a recent close broke above the key high and price is now back
//! within tolerance of it (old resistance acting as support). Bearish mirror
//! on the key low.

use super::{highest_high, lowest_low, PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

#[derive(Debug, Clone)]
pub struct BreakerDetector {
    /// Bars (ending before the recent segment) that define the key levels.
    pub lookback: usize,
    /// Bars, including the current one, in which the break and retest happen.
    pub recent: usize,
    /// Retest tolerance as a fraction of the level.
    pub tolerance: f64,
}

impl Default for BreakerDetector {
    fn default() -> Self {
        Self {
            lookback: 20,
            recent: 5,
            tolerance: 0.01,
        }
    }
}

impl BreakerDetector {
    fn retest_strength(&self, close: f64, level: f64) -> Option<f64> {
        if level <= 0.0 {
            return None;
        }
        let distance = (close - level).abs() / level;
        (distance <= self.tolerance).then(|| 1.0 - distance / self.tolerance)
    }
}

impl PatternDetector for BreakerDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::BreakerBlock
    }

    fn min_bars(&self) -> usize {
        self.lookback
    }

    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation> {
        let candles = window.candles();
        let n = candles.len();
        if n < self.min_bars() || self.recent == 0 || self.recent >= self.lookback {
            return Vec::new();
        }

        let key = &candles[n - self.lookback..n - self.recent];
        // the break must precede the current bar
        let breakout = &candles[n - self.recent..n - 1];
        let close = candles[n - 1].close;
        let key_high = highest_high(key);
        let key_low = lowest_low(key);

        if breakout.iter().any(|c| c.close > key_high) {
            if let Some(strength) = self.retest_strength(close, key_high) {
                return vec![PatternObservation::new(
                    self.kind(),
                    Direction::Bullish,
                    strength,
                    n - 1,
                )];
            }
        }
        if breakout.iter().any(|c| c.close < key_low) {
            if let Some(strength) = self.retest_strength(close, key_low) {
                return vec![PatternObservation::new(
                    self.kind(),
                    Direction::Bearish,
                    strength,
                    n - 1,
                )];
            }
        }
        Vec::new()
    }
}
