//! Liquidity Sweep: the current bar runs the stops beyond a recent extreme
//! and closes back inside.
//!
//! Bullish: low pierces the prior `lookback`-bar low, close recovers above it.
//! Strength is the recovery relative to the sweep wick:
//! (close - prior_low) / (close - low).

use super::{highest_high, lowest_low, PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

#[derive(Debug, Clone)]
pub struct SweepDetector {
    pub lookback: usize,
}

impl Default for SweepDetector {
    fn default() -> Self {
        Self { lookback: 10 }
    }
}

impl PatternDetector for SweepDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::LiquiditySweep
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

        let prior = &candles[n - 1 - self.lookback..n - 1];
        let bar = &candles[n - 1];
        let prior_low = lowest_low(prior);
        let prior_high = highest_high(prior);

        if bar.low < prior_low && bar.close > prior_low {
            let wick = bar.close - bar.low;
            let strength = (bar.close - prior_low) / wick;
            return vec![PatternObservation::new(
                self.kind(),
                Direction::Bullish,
                strength,
                n - 1,
            )];
        }
        if bar.high > prior_high && bar.close < prior_high {
            let wick = bar.high - bar.close;
            let strength = (prior_high - bar.close) / wick;
            return vec![PatternObservation::new(
                self.kind(),
                Direction::Bearish,
                strength,
                n - 1,
            )];
        }
        Vec::new()
    }
}
