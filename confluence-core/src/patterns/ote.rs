//! Optimal Trade Entry: price retraced into the Fibonacci band of the
//! recent swing.
//!
//! r = (swing_high - close) / (swing_high - swing_low). A deep retracement
//! (0.618–0.786) is a bullish entry zone; a shallow one (0.236–0.382) after a
//! drop is the bearish zone. Strength peaks at the band centre.

use super::{highest_high, lowest_low, PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

#[derive(Debug, Clone)]
pub struct OteDetector {
    pub lookback: usize,
    pub bullish_band: (f64, f64),
    pub bearish_band: (f64, f64),
}

impl Default for OteDetector {
    fn default() -> Self {
        Self {
            lookback: 20,
            bullish_band: (0.618, 0.786),
            bearish_band: (0.236, 0.382),
        }
    }
}

fn band_strength(r: f64, (lo, hi): (f64, f64)) -> Option<f64> {
    if r < lo || r > hi {
        return None;
    }
    let centre = (lo + hi) / 2.0;
    let half_width = (hi - lo) / 2.0;
    Some(1.0 - (r - centre).abs() / half_width)
}

impl PatternDetector for OteDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::OptimalTradeEntry
    }

    fn min_bars(&self) -> usize {
        self.lookback
    }

    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation> {
        let candles = window.candles();
        let n = candles.len();
        if n < self.min_bars() || self.lookback == 0 {
            return Vec::new();
        }

        let swing = &candles[n - self.lookback..];
        let high = highest_high(swing);
        let low = lowest_low(swing);
        let range = high - low;
        if range <= 0.0 {
            return Vec::new();
        }
        let r = (high - candles[n - 1].close) / range;

        if let Some(strength) = band_strength(r, self.bullish_band) {
            return vec![PatternObservation::new(
                self.kind(),
                Direction::Bullish,
                strength,
                n - 1,
            )];
        }
        if let Some(strength) = band_strength(r, self.bearish_band) {
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
