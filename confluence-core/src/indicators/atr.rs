//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR here is the simple mean of the last `period` true ranges.
//! Lookback: period (needs period+1 candles).

use super::Indicator;
use crate::domain::Candle;

/// Default ATR period used for stop distances.
pub const DEFAULT_ATR_PERIOD: usize = 14;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Default for Atr {
    fn default() -> Self {
        Self::new(DEFAULT_ATR_PERIOD)
    }
}

/// True range for every candle after the first.
///
/// `tr[k]` belongs to `candles[k + 1]`; the output has `len - 1` entries.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            (cur.high - cur.low)
                .max((cur.high - prev.close).abs())
                .max((cur.low - prev.close).abs())
        })
        .collect()
}

/// ATR at the last candle. Returns `0.0` when fewer than `period + 1`
/// candles are available; callers treat 0 as "no usable volatility".
pub fn atr(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period + 1 {
        return 0.0;
    }
    let tail = &candles[candles.len() - period - 1..];
    let tr = true_range(tail);
    let value = tr.iter().sum::<f64>() / period as f64;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period + 1 {
            return result;
        }

        let tr = true_range(candles);
        let mut sum: f64 = tr[..self.period].iter().sum();
        result[self.period] = sum / self.period as f64;

        for i in (self.period + 1)..n {
            // tr index is bar index - 1
            sum += tr[i - 1] - tr[i - 1 - self.period];
            result[i] = sum / self.period as f64;
        }

        result
    }
}
