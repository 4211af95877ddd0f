//! Engine configuration: every weight, threshold and period in one place.
//!
//! All fields default, so a TOML `[engine]` table only needs the values it
//! changes.

use serde::{Deserialize, Serialize};

use crate::confluence::ConfluenceWeights;
use crate::error::{require_positive, ConfigError};
use crate::features::FeatureConfig;
use crate::risk::RiskConfig;
use crate::scoring::{ScoringWeights, Thresholds};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub features: FeatureConfig,
    pub scoring: ScoringWeights,
    pub confluence: ConfluenceWeights,
    pub thresholds: Thresholds,
    pub risk: RiskConfig,
    /// Most recent candles requested per window.
    pub max_bars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            scoring: ScoringWeights::default(),
            confluence: ConfluenceWeights::default(),
            thresholds: Thresholds::default(),
            risk: RiskConfig::default(),
            max_bars: 500,
        }
    }
}

impl EngineConfig {
    /// Shortest primary window the engine will evaluate: enough for ATR.
    pub fn min_primary_bars(&self) -> usize {
        self.features.atr_period + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk.validate()?;
        require_positive("thresholds.signal_threshold", self.thresholds.signal_threshold)?;
        if !(0.0..=100.0).contains(&self.thresholds.min_confidence) {
            return Err(ConfigError::invalid(
                "thresholds.min_confidence",
                self.thresholds.min_confidence,
                "must be within 0..=100",
            ));
        }
        if !(self.thresholds.rr_tolerance.is_finite() && self.thresholds.rr_tolerance >= 0.0) {
            return Err(ConfigError::invalid(
                "thresholds.rr_tolerance",
                self.thresholds.rr_tolerance,
                "must be a non-negative number",
            ));
        }
        for (name, period) in [
            ("features.atr_period", self.features.atr_period),
            ("features.rsi_period", self.features.rsi_period),
            ("features.volume_period", self.features.volume_period),
            ("features.trend_sma_period", self.features.trend_sma_period),
            ("scoring.recency_bars", self.scoring.recency_bars),
        ] {
            if period == 0 {
                return Err(ConfigError::invalid(name, 0.0, "must be at least 1"));
            }
        }
        if self.max_bars < self.min_primary_bars() {
            return Err(ConfigError::invalid(
                "max_bars",
                self.max_bars as f64,
                "must cover the ATR period",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
        assert_eq!(EngineConfig::default().min_primary_bars(), 15);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: EngineConfig = toml::from_str(
            r#"
            [risk]
            account_balance = 25000.0

            [thresholds]
            min_confidence = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.risk.account_balance, 25_000.0);
        assert_eq!(cfg.risk.risk_reward_target, 1.5);
        assert_eq!(cfg.thresholds.min_confidence, 40.0);
        assert_eq!(cfg.scoring.patterns.fvg, 1.0);
    }

    #[test]
    fn rejects_out_of_range_confidence_floor() {
        let mut cfg = EngineConfig::default();
        cfg.thresholds.min_confidence = 120.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_max_bars_below_atr_needs() {
        let cfg = EngineConfig {
            max_bars: 10,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
