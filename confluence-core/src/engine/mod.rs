//! Signal engine: turns a market snapshot into a decision.
//!
//! Per evaluation:
//!
//! 1. Guard: the primary window must cover the ATR period
//! 2. Extract features and run every pattern detector on the primary window
//! 3. Analyse the kill zone at the last candle and the multi-timeframe confluence
//! 4. Score, classify, rate confidence, derive order parameters, apply the gates
//!
//! The engine holds configuration only. Every call is independent and the
//! same snapshot always produces the same decision.

pub mod config;

pub use config::EngineConfig;

use serde::Serialize;
use tracing::debug;

use crate::adjust::{self, NeutralAdjuster, ScoreAdjuster};
use crate::confluence::{self, ConfluenceResult, TimeframeSet};
use crate::domain::{CandleWindow, Timeframe};
use crate::features::{self, MarketFeatures};
use crate::patterns::{self, PatternDetector, PatternObservation};
use crate::risk;
use crate::scoring::{self, Rejection};
use crate::session::{self, SessionAnalysis};
use crate::signal::{Signal, SignalDraft};

/// Everything the engine reads for one `(symbol, primary timeframe)` evaluation.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub primary: CandleWindow,
    pub timeframes: TimeframeSet,
}

impl MarketSnapshot {
    pub fn new(symbol: impl Into<String>, primary: CandleWindow, timeframes: TimeframeSet) -> Self {
        Self {
            symbol: symbol.into(),
            primary,
            timeframes,
        }
    }
}

/// Why no signal was emitted. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SuppressReason {
    InsufficientData { bars: usize, required: usize },
    BelowThreshold { score: f64 },
    Rejected { rejection: Rejection },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Emit { signal: Signal },
    Suppress { suppressed: SuppressReason },
}

impl Decision {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Decision::Emit { signal } => Some(signal),
            Decision::Suppress { .. } => None,
        }
    }

    pub fn into_signal(self) -> Option<Signal> {
        match self {
            Decision::Emit { signal } => Some(signal),
            Decision::Suppress { .. } => None,
        }
    }

    pub fn suppression(&self) -> Option<&SuppressReason> {
        match self {
            Decision::Emit { .. } => None,
            Decision::Suppress { suppressed } => Some(suppressed),
        }
    }

    fn suppress(reason: SuppressReason) -> Self {
        Decision::Suppress { suppressed: reason }
    }
}

pub struct SignalEngine {
    config: EngineConfig,
    detectors: Vec<Box<dyn PatternDetector>>,
    adjuster: Box<dyn ScoreAdjuster>,
}

impl std::fmt::Debug for SignalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalEngine")
            .field("config", &self.config)
            .field("detectors", &self.detectors.len())
            .field("adjuster", &self.adjuster.name())
            .finish()
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            detectors: patterns::default_detectors(),
            adjuster: Box::new(NeutralAdjuster),
        }
    }

    pub fn with_adjuster(mut self, adjuster: Box<dyn ScoreAdjuster>) -> Self {
        self.adjuster = adjuster;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a snapshot end to end.
    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> Decision {
        let required = self.config.min_primary_bars();
        let bars = snapshot.primary.len();
        let features = match features::extract(&snapshot.primary, &self.config.features) {
            Some(f) if bars >= required => f,
            _ => {
                debug!(symbol = %snapshot.symbol, bars, required, "insufficient data");
                return Decision::suppress(SuppressReason::InsufficientData { bars, required });
            }
        };

        let observations = patterns::detect_all(&self.detectors, &snapshot.primary);
        let session = session::analyze_with(features.evaluated_at, &self.config.scoring.session);
        let confluence = confluence::analyze(&snapshot.timeframes, &self.config.confluence);

        self.decide(
            &snapshot.symbol,
            snapshot.primary.timeframe(),
            &features,
            &observations,
            &session,
            &confluence,
        )
    }

    /// The pure decision step, from already-computed inputs.
    pub fn decide(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        features: &MarketFeatures,
        observations: &[PatternObservation],
        session: &SessionAnalysis,
        confluence: &ConfluenceResult,
    ) -> Decision {
        let weights = &self.config.scoring;
        let patterns = scoring::pattern_score(observations, features.bar_count, weights);
        let score = scoring::aggregate(&patterns, session, features.close_trend, confluence, weights);

        let Some(side) = scoring::classify(score.total, &self.config.thresholds) else {
            debug!(symbol, %timeframe, score = score.total, "below threshold");
            return Decision::suppress(SuppressReason::BelowThreshold { score: score.total });
        };

        let confidence =
            scoring::score_confidence(side, features, session.strength, patterns.aligned(side));
        let draft = SignalDraft {
            symbol: symbol.to_string(),
            timeframe,
            side,
            score,
            confidence,
            pattern_summary: patterns.summary(side),
            evaluated_at: features.evaluated_at,
        };
        let adjusted = adjust::apply(self.adjuster.as_ref(), &draft, features);

        let mut params = risk::derive(side, features.close, features.atr, &self.config.risk);
        if let Err(rejection) = scoring::validate(
            &params,
            features.atr,
            adjusted,
            &self.config.risk,
            &self.config.thresholds,
        ) {
            debug!(symbol, %timeframe, %side, %rejection, "signal rejected");
            return Decision::suppress(SuppressReason::Rejected { rejection });
        }
        // Accepted within tolerance: report the floor, never a hair under it.
        params.risk_reward = params.risk_reward.max(self.config.risk.min_risk_reward);

        let signal = Signal::assemble(draft, &params, adjusted, confluence);
        debug!(symbol, %timeframe, id = %signal.id(), %side, confidence = adjusted, "signal emitted");
        Decision::Emit { signal }
    }
}
