//! Change of Character: the first break against the prevailing structure.
//!
//! The last `3 × segment` bars are split into old / mid / recent segments.
//! Bullish: the mid segment made a lower high than the old one (downtrend),
//! then the recent segment and the current close take out that mid high.
//! Bearish mirror on higher lows.

use super::{highest_high, lowest_low, PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

#[derive(Debug, Clone)]
pub struct ChochDetector {
    pub segment: usize,
    pub full_strength_break: f64,
}

impl Default for ChochDetector {
    fn default() -> Self {
        Self {
            segment: 10,
            full_strength_break: 0.01,
        }
    }
}

impl PatternDetector for ChochDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::ChangeOfCharacter
    }

    fn min_bars(&self) -> usize {
        self.segment * 3
    }

    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation> {
        let candles = window.candles();
        let n = candles.len();
        if n < self.min_bars() || self.segment == 0 {
            return Vec::new();
        }

        let s = self.segment;
        let old = &candles[n - 3 * s..n - 2 * s];
        let mid = &candles[n - 2 * s..n - s];
        let recent = &candles[n - s..];
        let close = candles[n - 1].close;

        let (old_high, mid_high) = (highest_high(old), highest_high(mid));
        if mid_high < old_high && highest_high(recent) > mid_high && close > mid_high && mid_high > 0.0
        {
            let distance = (close - mid_high) / mid_high;
            return vec![PatternObservation::new(
                self.kind(),
                Direction::Bullish,
                distance / self.full_strength_break,
                n - 1,
            )];
        }

        let (old_low, mid_low) = (lowest_low(old), lowest_low(mid));
        if mid_low > old_low && lowest_low(recent) < mid_low && close < mid_low && mid_low > 0.0 {
            let distance = (mid_low - close) / mid_low;
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
