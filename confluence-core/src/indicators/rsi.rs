//! Wilder RSI over closes.
//!
//! The first value (index `period`) seeds from simple means of the first
//! `period` gains and losses; later values use Wilder's `1/period` smoothing.
//! A series with no losses reads 100, no gains 0, no movement at all 50.

use super::Indicator;
use crate::domain::Candle;

pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

/// RSI at the last candle, or `None` with fewer than `period + 1` candles.
pub fn rsi(candles: &[Candle], period: usize) -> Option<f64> {
    Rsi::new(period).latest(candles)
}

/// `(gain, loss)` of the close-to-close move into each candle after the first.
fn moves(candles: &[Candle]) -> impl Iterator<Item = (f64, f64)> + '_ {
    candles.windows(2).map(|w| {
        let delta = w[1].close - w[0].close;
        (delta.max(0.0), (-delta).max(0.0))
    })
}

fn from_averages(gain: f64, loss: f64) -> f64 {
    match (gain > 0.0, loss > 0.0) {
        (false, false) => 50.0,
        (true, false) => 100.0,
        (false, true) => 0.0,
        (true, true) => 100.0 - 100.0 / (1.0 + gain / loss),
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let mut out = vec![f64::NAN; candles.len()];
        if candles.len() <= self.period {
            return out;
        }

        let p = self.period as f64;
        let mut moves = moves(candles);
        let (mut gain, mut loss) = moves
            .by_ref()
            .take(self.period)
            .fold((0.0, 0.0), |(g, l), (mg, ml)| (g + mg / p, l + ml / p));
        out[self.period] = from_averages(gain, loss);

        for (slot, (mg, ml)) in out[self.period + 1..].iter_mut().zip(moves) {
            gain += (mg - gain) / p;
            loss += (ml - loss) / p;
            *slot = from_averages(gain, loss);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn rsi_all_gains() {
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&candles);
        assert!(result[2].is_nan());
        assert_approx(result[3], 100.0, DEFAULT_EPSILON);
        assert_approx(result[5], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_losses() {
        let candles = make_candles(&[105.0, 104.0, 103.0, 102.0, 101.0]);
        assert_eq!(rsi(&candles, 3), Some(0.0));
    }

    #[test]
    fn rsi_flat_is_fifty() {
        let candles = make_candles(&[100.0; 20]);
        assert_eq!(rsi(&candles, 14), Some(50.0));
    }

    #[test]
    fn rsi_seed_value() {
        // changes: +2, -1, +2 → avg_gain 4/3, avg_loss 1/3 → RS 4 → RSI 80
        let candles = make_candles(&[100.0, 102.0, 101.0, 103.0]);
        assert_approx(rsi(&candles, 3).unwrap(), 80.0, 1e-9);
    }

    #[test]
    fn rsi_wilder_step() {
        // seed as above, then change -1: avg_gain 8/9, avg_loss 5/9 → RSI 100 - 100/(1+1.6)
        let candles = make_candles(&[100.0, 102.0, 101.0, 103.0, 102.0]);
        let expected = 100.0 - 100.0 / (1.0 + 8.0 / 5.0);
        assert_approx(rsi(&candles, 3).unwrap(), expected, 1e-9);
    }

    #[test]
    fn rsi_insufficient() {
        let candles = make_candles(&[100.0, 101.0, 102.0]);
        assert_eq!(rsi(&candles, 3), None);
    }
}
