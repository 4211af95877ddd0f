//! Deterministic synthetic candles.
//!
//! Each `(seed, symbol, timeframe)` gets its own BLAKE3-derived RNG stream,
//! so adding a symbol or timeframe never changes another one's candles.
//! Windows end at a fixed anchor time, not the wall clock, so repeated
//! scans are reproducible. Synthetic data is for demos and tests only.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use confluence_core::domain::{Candle, CandleWindow, Timeframe};
use confluence_core::provider::{CandleProvider, ProviderError};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    end: DateTime<Utc>,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            end: Utc
                .with_ymd_and_hms(2024, 6, 4, 14, 0, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    /// Timestamp of the last candle in every window.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = end;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng_for(&self, symbol: &str, timeframe: Timeframe) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        hasher.update(&[0]);
        hasher.update(timeframe.label().as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Random walk of `n` candles ending at the anchor.
    pub fn generate(&self, symbol: &str, timeframe: Timeframe, n: usize) -> Vec<Candle> {
        let mut rng = self.rng_for(symbol, timeframe);
        // Per-bar volatility scales with the square root of bar length.
        let vol = 0.002 * (timeframe.minutes() as f64 / 60.0).sqrt();
        let drift = rng.gen_range(-0.2..0.2) * vol;
        let mut price = rng.gen_range(20.0..2000.0_f64);

        (0..n)
            .map(|i| {
                let bars_back = (n - 1 - i) as i64;
                let timestamp = self.end - Duration::minutes(timeframe.minutes() * bars_back);
                let open = price;
                let close = (price * (1.0 + drift + rng.gen_range(-vol..vol))).max(0.01);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..vol / 2.0));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..vol / 2.0));
                let volume = rng.gen_range(500.0..5000.0);
                price = close;
                Candle::new(timestamp, open, high, low, close, volume)
            })
            .collect()
    }
}

impl CandleProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        max_bars: usize,
    ) -> Result<CandleWindow, ProviderError> {
        let candles = self.generate(symbol, timeframe, max_bars);
        Ok(CandleWindow::new(symbol, timeframe, candles)?)
    }
}
