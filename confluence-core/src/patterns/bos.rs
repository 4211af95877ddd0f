//! Break of Structure: the current bar trades and closes through the swing
//! extreme of the preceding bars, continuing the trend.

use super::{highest_high, lowest_low, PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

#[derive(Debug, Clone)]
pub struct BosDetector {
    pub lookback: usize,
    /// Break distance (fraction of the swing level) at which strength saturates.
    pub full_strength_break: f64,
}

impl Default for BosDetector {
    fn default() -> Self {
        Self {
            lookback: 10,
            full_strength_break: 0.01,
        }
    }
}

impl PatternDetector for BosDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::BreakOfStructure
    }

    fn min_bars(&self) -> usize {
        self.lookback + 1
    }

    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation> {
        let candles = window.candles();
        let n = candles.len();
        if n < self.min_bars() {
            return Vec::new();
        }

        let swing = &candles[n - 1 - self.lookback..n - 1];
        let bar = &candles[n - 1];
        let swing_high = highest_high(swing);
        let swing_low = lowest_low(swing);

        if bar.high > swing_high && bar.close > swing_high && swing_high > 0.0 {
            let distance = (bar.close - swing_high) / swing_high;
            return vec![PatternObservation::new(
                self.kind(),
                Direction::Bullish,
                distance / self.full_strength_break,
                n - 1,
            )];
        }
        if bar.low < swing_low && bar.close < swing_low && swing_low > 0.0 {
            let distance = (swing_low - bar.close) / swing_low;
            return vec![PatternObservation::new(
                self.kind(),
                Direction::Bearish,
                distance / self.full_strength_break,
                n - 1,
            )];
        }
        Vec::new()
    }
}
