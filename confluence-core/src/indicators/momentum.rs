//! Momentum as a percentage change over a lookback.
//!
//! momentum[t] = (close[t] - close[t-period]) / close[t-period] * 100
//! Lookback: period.

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct MomentumPercent {
    period: usize,
    name: String,
}

impl MomentumPercent {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("momentum_pct_{period}"),
        }
    }
}

fn pct_change(prev: f64, curr: f64) -> f64 {
    if prev == 0.0 {
        f64::NAN
    } else {
        (curr - prev) / prev * 100.0
    }
}

/// Percent momentum at the last candle.
pub fn momentum_percent(candles: &[Candle], period: usize) -> Option<f64> {
    let n = candles.len();
    if period == 0 || n < period + 1 {
        return None;
    }
    let value = pct_change(candles[n - 1 - period].close, candles[n - 1].close);
    value.is_finite().then_some(value)
}

impl Indicator for MomentumPercent {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];
        for i in self.period..n {
            result[i] = pct_change(candles[i - self.period].close, candles[i].close);
        }
        result
    }
}
