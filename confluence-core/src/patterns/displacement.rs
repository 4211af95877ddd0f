//! Displacement: an outsized 5-bar move for the window's timeframe.

use super::{PatternDetector, PatternKind, PatternObservation};
use crate::domain::{CandleWindow, Direction};

/// Bars spanned by the measured move.
const SPAN: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct DisplacementDetector;

impl PatternDetector for DisplacementDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::Displacement
    }

    fn min_bars(&self) -> usize {
        SPAN + 1
    }

    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation> {
        let candles = window.candles();
        let n = candles.len();
        if n < self.min_bars() {
            return Vec::new();
        }

        let base = candles[n - 1 - SPAN].close;
        if base <= 0.0 {
            return Vec::new();
        }
        let change = (candles[n - 1].close - base) / base;
        let threshold = window.timeframe().displacement_threshold();
        if change.abs() <= threshold {
            return Vec::new();
        }

        vec![PatternObservation::new(
            self.kind(),
            Direction::from_sign(change),
            change.abs() / (2.0 * threshold),
            n - 1,
        )]
    }
}
