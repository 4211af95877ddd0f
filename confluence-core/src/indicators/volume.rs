//! Volume ratio: current volume relative to the mean of the preceding bars.
//!
//! ratio[t] = volume[t] / mean(volume[t-period..t])
//! A non-positive average yields a neutral 1.0.
//! Lookback: period.

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
    name: String,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("volume_ratio_{period}"),
        }
    }
}

fn ratio(current: f64, average: f64) -> f64 {
    if average > 0.0 {
        current / average
    } else {
        1.0
    }
}

/// Volume ratio at the last candle against the previous `period` candles.
pub fn volume_ratio(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }
    let n = candles.len();
    let average = candles[n - 1 - period..n - 1]
        .iter()
        .map(|c| c.volume)
        .sum::<f64>()
        / period as f64;
    let value = ratio(candles[n - 1].volume, average);
    value.is_finite().then_some(value)
}

impl Indicator for VolumeRatio {
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
            let average = candles[i - self.period..i]
                .iter()
                .map(|c| c.volume)
                .sum::<f64>()
                / self.period as f64;
            result[i] = ratio(candles[i].volume, average);
        }
        result
    }
}
