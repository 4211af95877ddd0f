//! Indicator implementations over candle slices.
//!
//! Every indicator implements [`Indicator`]: a full series aligned to the
//! input (NaN during warmup) plus a convenience accessor for the latest
//! value. Scoring only ever needs the latest value, but the series form keeps
//! the indicators testable bar by bar.

pub mod atr;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use atr::{atr, true_range, Atr};
pub use momentum::{momentum_percent, MomentumPercent};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};
pub use volume::{volume_ratio, VolumeRatio};

use crate::domain::Candle;

/// A single-series indicator computed over a candle slice.
pub trait Indicator: Send + Sync {
    /// Stable name, e.g. `"atr_14"`.
    fn name(&self) -> &str;

    /// Number of leading bars that are NaN in the output series.
    fn lookback(&self) -> usize;

    /// Compute the full series. Output length equals `candles.len()`.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;

    /// Value at the last bar, or `None` while still warming up.
    fn latest(&self, candles: &[Candle]) -> Option<f64> {
        self.compute(candles)
            .last()
            .copied()
            .filter(|v| v.is_finite())
    }
}

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle), high = max(open, close) + 1,
/// low = min(open, close) - 1, volume = 1000, one hour apart.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle::new(
                base + chrono::Duration::hours(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000.0,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
