//! Fair Value Gap: a three-candle price imbalance.
//!
//! Bullish at bar i when low[i+1] > high[i-1]: the middle candle moved so fast
//! that the candles either side of it do not overlap. Bearish mirror when
//! high[i+1] < low[i-1]. The gap is measured relative to the outer bar's edge.

use super::{PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

#[derive(Debug, Clone)]
pub struct FvgDetector {
    /// Gaps smaller than this fraction are noise.
    pub min_gap: f64,
    /// Gap fraction at which strength saturates.
    pub full_strength_gap: f64,
}

impl Default for FvgDetector {
    fn default() -> Self {
        Self {
            min_gap: 0.001,
            full_strength_gap: 0.02,
        }
    }
}

impl FvgDetector {
    fn strength(&self, gap: f64) -> f64 {
        (gap / self.full_strength_gap).min(1.0)
    }
}

impl PatternDetector for FvgDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::FairValueGap
    }

    fn min_bars(&self) -> usize {
        3
    }

    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation> {
        let candles = window.candles();
        if candles.len() < self.min_bars() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for i in 1..candles.len() - 1 {
            let before = &candles[i - 1];
            let after = &candles[i + 1];

            if after.low > before.high && before.high > 0.0 {
                let gap = (after.low - before.high) / before.high;
                if gap >= self.min_gap {
                    found.push(PatternObservation::new(
                        self.kind(),
                        Direction::Bullish,
                        self.strength(gap),
                        i,
                    ));
                }
            } else if after.high < before.low && before.low > 0.0 {
                let gap = (before.low - after.high) / before.low;
                if gap >= self.min_gap {
                    found.push(PatternObservation::new(
                        self.kind(),
                        Direction::Bearish,
                        self.strength(gap),
                        i,
                    ));
                }
            }
        }
        found
    }
}
