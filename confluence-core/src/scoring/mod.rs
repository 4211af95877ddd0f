//! Signal scoring: aggregation, classification, confidence and hard gates.
//!
//! The signal score is the sum of four signed parts:
//! - pattern score: recent observations, netted per kind and weighted,
//! - session score: amplifies the prevailing direction inside a kill zone,
//! - session momentum: three consecutive closes in one direction,
//! - confluence score from the multi-timeframe engine.
//!
//! Every weight here is a calibration knob, not a derived constant.

pub mod confidence;
pub mod validator;

pub use confidence::{score_confidence, ConfidenceBreakdown, PatternTier};
pub use validator::{validate, Rejection};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::confluence::ConfluenceResult;
use crate::domain::{Direction, SignalSide};
use crate::patterns::{PatternKind, PatternObservation};
use crate::session::{SessionAnalysis, SessionScores};

/// Weight per pattern kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternWeights {
    pub fvg: f64,
    pub order_block: f64,
    pub liquidity_sweep: f64,
    pub bos: f64,
    pub choch: f64,
    pub breaker: f64,
    pub displacement: f64,
    pub ote: f64,
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            fvg: 1.0,
            order_block: 0.8,
            liquidity_sweep: 0.8,
            bos: 1.0,
            choch: 0.8,
            breaker: 0.5,
            displacement: 0.7,
            ote: 0.6,
        }
    }
}

impl PatternWeights {
    pub fn weight(&self, kind: PatternKind) -> f64 {
        match kind {
            PatternKind::FairValueGap => self.fvg,
            PatternKind::OrderBlock => self.order_block,
            PatternKind::LiquiditySweep => self.liquidity_sweep,
            PatternKind::BreakOfStructure => self.bos,
            PatternKind::ChangeOfCharacter => self.choch,
            PatternKind::BreakerBlock => self.breaker,
            PatternKind::Displacement => self.displacement,
            PatternKind::OptimalTradeEntry => self.ote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub patterns: PatternWeights,
    pub session: SessionScores,
    /// Contribution of three consecutive closes at full session strength.
    pub momentum_weight: f64,
    pub confluence_weight: f64,
    /// Only observations anchored in the last N bars count.
    pub recency_bars: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            patterns: PatternWeights::default(),
            session: SessionScores::default(),
            momentum_weight: 0.3,
            confluence_weight: 1.0,
            recency_bars: 20,
        }
    }
}

/// Classification and gate thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// `score >= +t` is BUY, `score <= -t` is SELL.
    pub signal_threshold: f64,
    /// Confidence floor, 0–100.
    pub min_confidence: f64,
    /// Slack on the risk/reward floor comparison.
    pub rr_tolerance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            signal_threshold: 1.0,
            min_confidence: 30.0,
            rr_tolerance: 1e-9,
        }
    }
}

/// Weighted, netted pattern contribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternScore {
    /// Weighted signed score per kind that had recent observations.
    pub per_kind: BTreeMap<PatternKind, f64>,
    pub total: f64,
}

impl PatternScore {
    /// Sum of the kinds pointing in `side`'s direction, as a positive number.
    pub fn aligned(&self, side: SignalSide) -> f64 {
        self.per_kind
            .values()
            .map(|v| v * side.sign())
            .filter(|v| *v > 0.0)
            .sum()
    }

    /// Labels such as "Bullish FVG" for the kinds aligned with `side`, in kind order.
    pub fn summary(&self, side: SignalSide) -> Vec<String> {
        self.per_kind
            .iter()
            .filter(|(_, v)| **v * side.sign() > 0.0)
            .map(|(kind, _)| format!("{} {}", side.direction(), kind))
            .collect()
    }
}

/// Net recent observations per kind, clamp to [-1, 1], apply kind weights.
pub fn pattern_score(
    observations: &[PatternObservation],
    bar_count: usize,
    weights: &ScoringWeights,
) -> PatternScore {
    let cutoff = bar_count.saturating_sub(weights.recency_bars);
    let mut net: BTreeMap<PatternKind, f64> = BTreeMap::new();
    for obs in observations.iter().filter(|o| o.anchor_index >= cutoff) {
        *net.entry(obs.kind).or_insert(0.0) += obs.signed_strength();
    }

    let per_kind: BTreeMap<PatternKind, f64> = net
        .into_iter()
        .map(|(kind, v)| (kind, v.clamp(-1.0, 1.0) * weights.patterns.weight(kind)))
        .filter(|(_, v)| *v != 0.0)
        .collect();
    let total = per_kind.values().sum();
    PatternScore { per_kind, total }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub pattern: f64,
    pub session: f64,
    pub momentum: f64,
    pub confluence: f64,
    pub total: f64,
}

/// Combine the four parts into the signal score.
///
/// The session part carries the sign of everything else: it amplifies the
/// prevailing direction and contributes nothing when there is none.
pub fn aggregate(
    patterns: &PatternScore,
    session: &SessionAnalysis,
    close_trend: Direction,
    confluence: &ConfluenceResult,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let pattern = patterns.total;
    let momentum =
        close_trend.sign() * weights.momentum_weight * session.strength.momentum_multiplier();
    let confluence = confluence.confluence_score * weights.confluence_weight;

    let subtotal = pattern + momentum + confluence;
    let session = Direction::from_sign(subtotal).sign() * session.score;

    ScoreBreakdown {
        pattern,
        session,
        momentum,
        confluence,
        total: subtotal + session,
    }
}

/// BUY, SELL, or nothing.
pub fn classify(score: f64, thresholds: &Thresholds) -> Option<SignalSide> {
    if score >= thresholds.signal_threshold {
        Some(SignalSide::Buy)
    } else if score <= -thresholds.signal_threshold {
        Some(SignalSide::Sell)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;
    use crate::session::SessionStrength;

    fn obs(kind: PatternKind, direction: Direction, strength: f64, at: usize) -> PatternObservation {
        PatternObservation::new(kind, direction, strength, at)
    }

    #[test]
    fn nets_and_clamps_per_kind() {
        let observations = [
            obs(PatternKind::FairValueGap, Direction::Bullish, 0.8, 25),
            obs(PatternKind::FairValueGap, Direction::Bullish, 0.7, 26),
            obs(PatternKind::OrderBlock, Direction::Bullish, 0.5, 27),
            obs(PatternKind::OrderBlock, Direction::Bearish, 0.5, 28),
        ];
        let score = pattern_score(&observations, 30, &ScoringWeights::default());
        // FVG 1.5 clamps to 1.0; OB nets to 0 and drops out
        assert_eq!(score.per_kind.len(), 1);
        assert_approx(score.total, 1.0, 1e-12);
    }

    #[test]
    fn stale_observations_ignored() {
        let observations = [obs(PatternKind::BreakOfStructure, Direction::Bearish, 1.0, 5)];
        let score = pattern_score(&observations, 30, &ScoringWeights::default());
        assert_eq!(score.total, 0.0);
    }

    #[test]
    fn summary_lists_aligned_kinds_in_order() {
        let observations = [
            obs(PatternKind::OptimalTradeEntry, Direction::Bullish, 0.5, 29),
            obs(PatternKind::FairValueGap, Direction::Bullish, 1.0, 28),
            obs(PatternKind::LiquiditySweep, Direction::Bearish, 1.0, 29),
        ];
        let score = pattern_score(&observations, 30, &ScoringWeights::default());
        assert_eq!(score.summary(SignalSide::Buy), ["Bullish FVG", "Bullish OTE"]);
        assert_eq!(score.summary(SignalSide::Sell), ["Bearish Sweep"]);
        assert_approx(score.aligned(SignalSide::Buy), 1.0 + 0.3, 1e-12);
        assert_approx(score.aligned(SignalSide::Sell), 0.8, 1e-12);
    }

    #[test]
    fn session_follows_subtotal_sign() {
        let patterns = PatternScore {
            per_kind: BTreeMap::from([(PatternKind::BreakOfStructure, -1.0)]),
            total: -1.0,
        };
        let session = SessionAnalysis {
            active: true,
            zone: None,
            score: 0.5,
            strength: SessionStrength::Maximum,
        };
        let b = aggregate(
            &patterns,
            &session,
            Direction::Bearish,
            &ConfluenceResult::neutral(),
            &ScoringWeights::default(),
        );
        assert_approx(b.momentum, -0.3, 1e-12);
        assert_approx(b.session, -0.5, 1e-12);
        assert_approx(b.total, -1.8, 1e-12);
    }

    #[test]
    fn session_alone_creates_no_direction() {
        let session = SessionAnalysis {
            active: true,
            zone: None,
            score: 0.5,
            strength: SessionStrength::Maximum,
        };
        let b = aggregate(
            &PatternScore::default(),
            &session,
            Direction::Neutral,
            &ConfluenceResult::neutral(),
            &ScoringWeights::default(),
        );
        assert_eq!(b.total, 0.0);
    }

    #[test]
    fn classification_is_inclusive_at_threshold() {
        let t = Thresholds::default();
        assert_eq!(classify(1.0, &t), Some(SignalSide::Buy));
        assert_eq!(classify(-1.0, &t), Some(SignalSide::Sell));
        assert_eq!(classify(0.99, &t), None);
    }
}
