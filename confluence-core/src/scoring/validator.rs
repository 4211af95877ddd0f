//! Hard gates applied after order parameters are known.
//!
//! Gates run in a fixed order and the first failure wins:
//! volatility, level ordering, risk/reward floor, confidence floor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Thresholds;
use crate::risk::{OrderParameters, RiskConfig, StopBasis};

/// Why a classified signal was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum Rejection {
    #[error("no usable volatility (ATR {atr})")]
    NoVolatility { atr: f64 },

    #[error("stop/target not distinct from entry (confidence collapsed to {collapsed_confidence:.1})")]
    DegenerateLevels { collapsed_confidence: f64 },

    #[error("risk/reward {risk_reward:.3} below minimum {minimum:.3}")]
    RiskRewardBelowMinimum { risk_reward: f64, minimum: f64 },

    #[error("confidence {confidence:.1} below floor {floor:.1}")]
    ConfidenceBelowFloor { confidence: f64, floor: f64 },
}

/// Factor applied to confidence when levels are degenerate, for the record only.
const DEGENERATE_CONFIDENCE_FACTOR: f64 = 0.1;

pub fn validate(
    params: &OrderParameters,
    atr: f64,
    confidence: f64,
    risk: &RiskConfig,
    thresholds: &Thresholds,
) -> Result<(), Rejection> {
    if !(atr.is_finite() && atr > 0.0) || params.stop_basis == StopBasis::PriceFallback {
        return Err(Rejection::NoVolatility { atr });
    }

    if !params.levels_are_ordered() {
        return Err(Rejection::DegenerateLevels {
            collapsed_confidence: confidence * DEGENERATE_CONFIDENCE_FACTOR,
        });
    }

    if params.risk_reward + thresholds.rr_tolerance < risk.min_risk_reward {
        return Err(Rejection::RiskRewardBelowMinimum {
            risk_reward: params.risk_reward,
            minimum: risk.min_risk_reward,
        });
    }

    if confidence < thresholds.min_confidence {
        return Err(Rejection::ConfidenceBelowFloor {
            confidence,
            floor: thresholds.min_confidence,
        });
    }

    Ok(())
}
