//! Order Block: a decisive candle straight after an opposite-direction candle.
//!
//! The opposite candle marks where larger participants absorbed the other
//! side before the impulse. Strength is how much of the impulse candle's
//! range is body.

use super::{PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

#[derive(Debug, Clone)]
pub struct OrderBlockDetector {
    /// Minimum body size relative to the open.
    pub min_body: f64,
}

impl Default for OrderBlockDetector {
    fn default() -> Self {
        Self { min_body: 0.005 }
    }
}

impl PatternDetector for OrderBlockDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::OrderBlock
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation> {
        let candles = window.candles();
        if candles.len() < self.min_bars() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for i in 1..candles.len() {
            let prev = &candles[i - 1];
            let bar = &candles[i];
            if bar.open <= 0.0 || bar.body() / bar.open < self.min_body {
                continue;
            }

            let direction = if bar.is_bullish() && prev.is_bearish() {
                Direction::Bullish
            } else if bar.is_bearish() && prev.is_bullish() {
                Direction::Bearish
            } else {
                continue;
            };

            let range = bar.range();
            let strength = if range > 0.0 { bar.body() / range } else { 0.0 };
            found.push(PatternObservation::new(self.kind(), direction, strength, i));
        }
        found
    }
}
