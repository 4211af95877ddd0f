//! Simple Moving Average (SMA) of closes.
//!
//! Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

/// Mean of the last `period` closes, or `None` if the slice is shorter.
pub fn sma(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }
    let tail = &candles[candles.len() - period..];
    let mean = tail.iter().map(|c| c.close).sum::<f64>() / period as f64;
    mean.is_finite().then_some(mean)
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        let mut sum: f64 = candles[..self.period].iter().map(|c| c.close).sum();
        result[self.period - 1] = sum / self.period as f64;

        for i in self.period..n {
            sum = sum - candles[i - self.period].close + candles[i].close;
            result[i] = sum / self.period as f64;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn sma_basic() {
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Sma::new(3).compute(&candles);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_point_value() {
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(sma(&candles, 5), Some(12.0));
        assert_eq!(sma(&candles, 6), None);
        assert_eq!(sma(&candles, 0), None);
    }

    #[test]
    fn sma_period_one_is_close() {
        let candles = make_candles(&[7.0, 9.0]);
        assert_eq!(Sma::new(1).compute(&candles), vec![7.0, 9.0]);
    }
}
