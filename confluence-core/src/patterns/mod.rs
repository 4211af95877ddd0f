//! Chart-pattern detectors.
//!
//! Each detector inspects a single [`CandleWindow`] and reports zero or more
//! [`PatternObservation`]s. Detectors are pure and total: a window shorter
//! than [`PatternDetector::min_bars`] yields no observations, never an error.
//! Observations are immutable once emitted; they describe market structure,
//! not a trading decision.

pub mod bos;
pub mod breaker;
pub mod choch;
pub mod displacement;
pub mod fvg;
pub mod order_block;
pub mod ote;
pub mod sweep;

pub use bos::BosDetector;
pub use breaker::BreakerDetector;
pub use choch::ChochDetector;
pub use displacement::DisplacementDetector;
pub use fvg::FvgDetector;
pub use order_block::OrderBlockDetector;
pub use ote::OteDetector;
pub use sweep::SweepDetector;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Candle, CandleWindow, Direction};

/// The eight recognised structures, in scoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    FairValueGap,
    OrderBlock,
    LiquiditySweep,
    BreakOfStructure,
    ChangeOfCharacter,
    BreakerBlock,
    Displacement,
    OptimalTradeEntry,
}

impl PatternKind {
    pub const ALL: [PatternKind; 8] = [
        PatternKind::FairValueGap,
        PatternKind::OrderBlock,
        PatternKind::LiquiditySweep,
        PatternKind::BreakOfStructure,
        PatternKind::ChangeOfCharacter,
        PatternKind::BreakerBlock,
        PatternKind::Displacement,
        PatternKind::OptimalTradeEntry,
    ];

    /// Short label used in pattern summaries.
    pub fn label(self) -> &'static str {
        match self {
            PatternKind::FairValueGap => "FVG",
            PatternKind::OrderBlock => "OB",
            PatternKind::LiquiditySweep => "Sweep",
            PatternKind::BreakOfStructure => "BOS",
            PatternKind::ChangeOfCharacter => "CHoCH",
            PatternKind::BreakerBlock => "Breaker",
            PatternKind::Displacement => "Displacement",
            PatternKind::OptimalTradeEntry => "OTE",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternObservation {
    pub kind: PatternKind,
    /// Bullish or Bearish; detectors never report Neutral.
    pub direction: Direction,
    /// Strength in [0, 1].
    pub strength: f64,
    /// Index into the window of the bar that completed the structure.
    pub anchor_index: usize,
}

impl PatternObservation {
    /// Builds an observation, clamping strength into [0, 1]. Non-finite
    /// strengths become 0.
    pub fn new(kind: PatternKind, direction: Direction, strength: f64, anchor_index: usize) -> Self {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            kind,
            direction,
            strength,
            anchor_index,
        }
    }

    /// Strength signed by direction.
    pub fn signed_strength(&self) -> f64 {
        self.direction.sign() * self.strength
    }

    /// e.g. "Bullish FVG".
    pub fn label(&self) -> String {
        format!("{} {}", self.direction, self.kind)
    }
}

/// A detector for one pattern kind.
pub trait PatternDetector: Send + Sync {
    fn kind(&self) -> PatternKind;

    /// Shortest window that can produce an observation.
    fn min_bars(&self) -> usize;

    /// Scan the window. Must return an empty vector (not panic) when
    /// `window.len() < self.min_bars()`.
    fn detect(&self, window: &CandleWindow) -> Vec<PatternObservation>;
}

/// All eight detectors in kind order.
pub fn default_detectors() -> Vec<Box<dyn PatternDetector>> {
    vec![
        Box::new(FvgDetector::default()),
        Box::new(OrderBlockDetector::default()),
        Box::new(SweepDetector::default()),
        Box::new(BosDetector::default()),
        Box::new(ChochDetector::default()),
        Box::new(BreakerDetector::default()),
        Box::new(DisplacementDetector),
        Box::new(OteDetector::default()),
    ]
}

/// Run every detector over the window and concatenate their observations.
pub fn detect_all(
    detectors: &[Box<dyn PatternDetector>],
    window: &CandleWindow,
) -> Vec<PatternObservation> {
    detectors
        .iter()
        .filter(|d| window.len() >= d.min_bars())
        .flat_map(|d| d.detect(window))
        .collect()
}

/// Highest high across a candle slice.
pub(crate) fn highest_high(candles: &[Candle]) -> f64 {
    candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max)
}

/// Lowest low across a candle slice.
pub(crate) fn lowest_low(candles: &[Candle]) -> f64 {
    candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min)
}

/// Build a window from `(open, high, low, close)` tuples, one hour apart.
#[cfg(test)]
pub fn make_window(
    timeframe: crate::domain::Timeframe,
    ohlc: &[(f64, f64, f64, f64)],
) -> CandleWindow {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let candles = ohlc
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| {
            Candle::new(base + chrono::Duration::hours(i as i64), o, h, l, c, 1000.0)
        })
        .collect();
    CandleWindow::new("TEST", timeframe, candles).unwrap()
}

/// `n` identical quiet candles around `price` (high/low ±0.05).
#[cfg(test)]
pub fn flat_bars(n: usize, price: f64) -> Vec<(f64, f64, f64, f64)> {
    vec![(price, price + 0.05, price - 0.05, price); n]
}
