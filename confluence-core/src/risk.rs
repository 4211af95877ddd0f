//! Order parameters: stop, target, trailing stop and position size.
//!
//! # Formula
//! ```text
//! stop_distance = stop_atr_multiplier * ATR
//! BUY:  stop = entry - d,  target = entry + d * risk_reward_target
//! SELL: stop = entry + d,  target = entry - d * risk_reward_target
//! risk_amount   = balance * risk_percent / 100
//! position_size = risk_amount / |entry - stop|
//! ```
//!
//! # Example
//! - Balance: 10,000, risk 2% (200)
//! - ATR 1.0, entry 100 → stop 99, target 101.5, RR 1.5
//! - Size: 200 / 1.0 = 200 units

use serde::{Deserialize, Serialize};

use crate::domain::SignalSide;
use crate::error::{require_positive, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub account_balance: f64,
    /// Percent of the balance risked per trade (2.0 = 2%).
    pub risk_percent_per_trade: f64,
    pub min_risk_reward: f64,
    pub risk_reward_target: f64,
    /// ATR multiple for the trailing stop.
    pub trail_multiplier: f64,
    /// ATR multiple for the initial stop.
    pub stop_atr_multiplier: f64,
    pub max_signals_per_symbol: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            account_balance: 10_000.0,
            risk_percent_per_trade: 2.0,
            min_risk_reward: 1.2,
            risk_reward_target: 1.5,
            trail_multiplier: 1.5,
            stop_atr_multiplier: 1.0,
            max_signals_per_symbol: 1,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("account_balance", self.account_balance)?;
        require_positive("risk_percent_per_trade", self.risk_percent_per_trade)?;
        if self.risk_percent_per_trade > 100.0 {
            return Err(ConfigError::invalid(
                "risk_percent_per_trade",
                self.risk_percent_per_trade,
                "cannot exceed 100",
            ));
        }
        require_positive("min_risk_reward", self.min_risk_reward)?;
        require_positive("risk_reward_target", self.risk_reward_target)?;
        if self.risk_reward_target < self.min_risk_reward {
            return Err(ConfigError::invalid(
                "risk_reward_target",
                self.risk_reward_target,
                "must be at least min_risk_reward",
            ));
        }
        require_positive("trail_multiplier", self.trail_multiplier)?;
        require_positive("stop_atr_multiplier", self.stop_atr_multiplier)?;
        if self.max_signals_per_symbol == 0 {
            return Err(ConfigError::invalid(
                "max_signals_per_symbol",
                0.0,
                "must allow at least one signal",
            ));
        }
        Ok(())
    }
}

/// Where the stop distance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopBasis {
    Atr,
    /// ATR was unusable; a price-tiered percentage stood in.
    PriceFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderParameters {
    pub side: SignalSide,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub trailing_stop: f64,
    pub position_size: f64,
    pub risk_reward: f64,
    pub stop_distance: f64,
    pub stop_basis: StopBasis,
}

impl OrderParameters {
    /// Stop and target are distinct from entry and on the correct sides.
    pub fn levels_are_ordered(&self) -> bool {
        match self.side {
            SignalSide::Buy => self.stop_loss < self.entry && self.entry < self.take_profit,
            SignalSide::Sell => self.take_profit < self.entry && self.entry < self.stop_loss,
        }
    }
}

/// Percentage stop used when ATR is unusable, tiered by price.
pub fn fallback_stop_fraction(price: f64) -> f64 {
    if price > 1000.0 {
        0.01
    } else if price > 100.0 {
        0.015
    } else if price > 10.0 {
        0.02
    } else {
        0.03
    }
}

/// Round a raw size to a sensible lot for its magnitude.
///
/// Never returns zero for a positive input.
pub fn round_position_size(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    let rounded = if raw >= 1000.0 {
        (raw / 100.0).round() * 100.0
    } else if raw >= 100.0 {
        (raw / 10.0).round() * 10.0
    } else if raw >= 1.0 {
        raw.round()
    } else {
        (raw * 10_000.0).round() / 10_000.0
    };
    rounded.max(0.0001)
}

/// Trailing stop that never gives back the entry: BUY `max(current - atr·m, entry)`,
/// SELL `min(current + atr·m, entry)`.
pub fn trailing_stop(side: SignalSide, entry: f64, current: f64, atr: f64, multiplier: f64) -> f64 {
    let offset = atr * multiplier;
    match side {
        SignalSide::Buy => (current - offset).max(entry),
        SignalSide::Sell => (current + offset).min(entry),
    }
}

/// Derive order parameters for a signal at `entry`.
pub fn derive(side: SignalSide, entry: f64, atr: f64, config: &RiskConfig) -> OrderParameters {
    let (stop_distance, stop_basis) = if atr.is_finite() && atr > 0.0 {
        (atr * config.stop_atr_multiplier, StopBasis::Atr)
    } else {
        (entry.abs() * fallback_stop_fraction(entry), StopBasis::PriceFallback)
    };

    let sign = side.sign();
    let stop_loss = entry - sign * stop_distance;
    let take_profit = entry + sign * stop_distance * config.risk_reward_target;

    let risk = (entry - stop_loss).abs();
    let reward = (take_profit - entry).abs();
    let (risk_reward, position_size) = if risk > 0.0 {
        let risk_amount = config.account_balance * config.risk_percent_per_trade / 100.0;
        (reward / risk, round_position_size(risk_amount / risk))
    } else {
        (0.0, 0.0)
    };

    OrderParameters {
        side,
        entry,
        stop_loss,
        take_profit,
        trailing_stop: trailing_stop(side, entry, entry, atr.max(0.0), config.trail_multiplier),
        position_size,
        risk_reward,
        stop_distance,
        stop_basis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn buy_levels() {
        let p = derive(SignalSide::Buy, 100.0, 1.0, &RiskConfig::default());
        assert_eq!(p.stop_loss, 99.0);
        assert_eq!(p.take_profit, 101.5);
        assert_approx(p.risk_reward, 1.5, 1e-12);
        assert_eq!(p.position_size, 200.0);
        assert_eq!(p.trailing_stop, 100.0);
        assert_eq!(p.stop_basis, StopBasis::Atr);
        assert!(p.levels_are_ordered());
    }

    #[test]
    fn sell_levels_mirror() {
        let p = derive(SignalSide::Sell, 50.0, 0.5, &RiskConfig::default());
        assert_eq!(p.stop_loss, 50.5);
        assert_eq!(p.take_profit, 49.25);
        assert!(p.levels_are_ordered());
        // 200 / 0.5 = 400
        assert_eq!(p.position_size, 400.0);
    }

    #[test]
    fn zero_atr_uses_fallback() {
        let p = derive(SignalSide::Buy, 2000.0, 0.0, &RiskConfig::default());
        assert_eq!(p.stop_basis, StopBasis::PriceFallback);
        assert_approx(p.stop_distance, 20.0, 1e-9);
        assert_eq!(p.position_size, 10.0);
    }

    #[test]
    fn fallback_tiers() {
        assert_eq!(fallback_stop_fraction(5000.0), 0.01);
        assert_eq!(fallback_stop_fraction(1000.0), 0.015);
        assert_eq!(fallback_stop_fraction(50.0), 0.02);
        assert_eq!(fallback_stop_fraction(10.0), 0.03);
    }

    #[test]
    fn degenerate_stop_has_zero_size_and_rr() {
        // ATR far below the float resolution at this price
        let p = derive(SignalSide::Sell, 1.0e6, 1.0e-12, &RiskConfig::default());
        assert_eq!(p.stop_loss, p.entry);
        assert_eq!(p.risk_reward, 0.0);
        assert_eq!(p.position_size, 0.0);
        assert!(!p.levels_are_ordered());
    }

    #[test]
    fn size_rounding_tiers() {
        assert_eq!(round_position_size(1234.0), 1200.0);
        assert_eq!(round_position_size(456.0), 460.0);
        assert_eq!(round_position_size(7.4), 7.0);
        assert_eq!(round_position_size(0.123456), 0.1235);
        assert_eq!(round_position_size(0.00001), 0.0001);
        assert_eq!(round_position_size(0.0), 0.0);
    }

    #[test]
    fn trailing_stop_never_below_entry_for_buys() {
        assert_eq!(trailing_stop(SignalSide::Buy, 100.0, 100.0, 1.0, 1.5), 100.0);
        assert_eq!(trailing_stop(SignalSide::Buy, 100.0, 105.0, 1.0, 1.5), 103.5);
        assert_eq!(trailing_stop(SignalSide::Sell, 100.0, 95.0, 1.0, 1.5), 96.5);
        assert_eq!(trailing_stop(SignalSide::Sell, 100.0, 100.0, 1.0, 1.5), 100.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(RiskConfig::default().validate().is_ok());
        let bad = RiskConfig {
            risk_percent_per_trade: 0.0,
            ..RiskConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = RiskConfig {
            max_signals_per_symbol: 0,
            ..RiskConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = RiskConfig {
            account_balance: f64::NAN,
            ..RiskConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = RiskConfig {
            risk_reward_target: 1.1,
            ..RiskConfig::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::InvalidParameter {
                name: "risk_reward_target",
                value: 1.1,
                reason: "must be at least min_risk_reward",
            })
        );
        let at_floor = RiskConfig {
            risk_reward_target: 1.2,
            ..RiskConfig::default()
        };
        assert!(at_floor.validate().is_ok());
    }
}
