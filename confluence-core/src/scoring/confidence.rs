//! Confidence: a 0–100 score built from independent factors.
//!
//! Confluence is deliberately not a factor; it already shapes the signal
//! score that decided the side.

use serde::{Deserialize, Serialize};

use crate::domain::SignalSide;
use crate::features::MarketFeatures;
use crate::session::SessionStrength;

/// Strength tier of the patterns aligned with the signal side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatternTier {
    None,
    Weak,
    Moderate,
    Strong,
}

impl PatternTier {
    pub fn from_score(aligned: f64) -> Self {
        if aligned >= 2.0 {
            PatternTier::Strong
        } else if aligned >= 1.0 {
            PatternTier::Moderate
        } else if aligned > 0.0 {
            PatternTier::Weak
        } else {
            PatternTier::None
        }
    }

    pub fn points(self) -> f64 {
        match self {
            PatternTier::Strong => 25.0,
            PatternTier::Moderate => 15.0,
            PatternTier::Weak => 5.0,
            PatternTier::None => 0.0,
        }
    }
}

/// Points per factor. `total` is capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub rsi: f64,
    pub volume: f64,
    pub trend: f64,
    pub session: f64,
    pub patterns: f64,
    pub tier: PatternTier,
    pub total: f64,
}

fn rsi_points(side: SignalSide, rsi: Option<f64>) -> f64 {
    let Some(rsi) = rsi else { return 0.0 };
    match side {
        SignalSide::Buy if (55.0..=70.0).contains(&rsi) => 20.0,
        SignalSide::Sell if (30.0..=45.0).contains(&rsi) => 20.0,
        _ if (45.0..=55.0).contains(&rsi) => 10.0,
        _ => 0.0,
    }
}

fn volume_points(ratio: Option<f64>) -> f64 {
    match ratio {
        Some(r) if r >= 1.5 => 20.0,
        Some(r) if r >= 1.2 => 15.0,
        Some(r) if r >= 1.0 => 10.0,
        _ => 0.0,
    }
}

fn trend_points(side: SignalSide, close: f64, sma: Option<f64>) -> f64 {
    let Some(sma) = sma else { return 10.0 };
    let aligned = match side {
        SignalSide::Buy => close > sma,
        SignalSide::Sell => close < sma,
    };
    if aligned {
        20.0
    } else {
        0.0
    }
}

pub fn score_confidence(
    side: SignalSide,
    features: &MarketFeatures,
    session: SessionStrength,
    aligned_pattern_score: f64,
) -> ConfidenceBreakdown {
    let tier = PatternTier::from_score(aligned_pattern_score);
    let rsi = rsi_points(side, features.rsi);
    let volume = volume_points(features.volume_ratio);
    let trend = trend_points(side, features.close, features.sma_trend);
    let session = session.confidence_bonus();
    let patterns = tier.points();
    ConfidenceBreakdown {
        rsi,
        volume,
        trend,
        session,
        patterns,
        tier,
        total: (rsi + volume + trend + session + patterns).clamp(0.0, 100.0),
    }
}
