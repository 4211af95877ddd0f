//! The emitted trading signal and its pre-validation draft.
//!
//! A [`Signal`] can only be built by the engine once every gate has passed,
//! so a partially populated or degenerate signal cannot exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::confluence::ConfluenceResult;
use crate::domain::{SignalSide, Timeframe};
use crate::risk::OrderParameters;
use crate::scoring::{ConfidenceBreakdown, ScoreBreakdown};

/// BLAKE3 fingerprint of a signal's identifying fields (hex, 16 chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(pub String);

impl SignalId {
    pub fn derive(
        symbol: &str,
        timeframe: Timeframe,
        side: SignalSide,
        timestamp: DateTime<Utc>,
        entry: f64,
    ) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(&[0]);
        hasher.update(timeframe.label().as_bytes());
        hasher.update(&[0]);
        hasher.update(side.as_str().as_bytes());
        hasher.update(&timestamp.timestamp_millis().to_le_bytes());
        hasher.update(&entry.to_bits().to_le_bytes());
        let hex = hasher.finalize().to_hex();
        Self(hex.as_str()[..16].to_string())
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A classified but not yet validated signal. Score adjusters see this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDraft {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub side: SignalSide,
    pub score: ScoreBreakdown,
    pub confidence: ConfidenceBreakdown,
    pub pattern_summary: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// An actionable trading signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    id: SignalId,
    symbol: String,
    timeframe: Timeframe,
    direction: SignalSide,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
    trailing_stop: f64,
    position_size: f64,
    confidence: f64,
    risk_reward: f64,
    signal_score: f64,
    pattern_summary: Vec<String>,
    rationale: String,
    timestamp: DateTime<Utc>,
}

impl Signal {
    /// Assemble from a validated draft. `confidence` is the final, adjusted value.
    pub(crate) fn assemble(
        draft: SignalDraft,
        params: &OrderParameters,
        confidence: f64,
        confluence: &ConfluenceResult,
    ) -> Self {
        let id = SignalId::derive(
            &draft.symbol,
            draft.timeframe,
            draft.side,
            draft.evaluated_at,
            params.entry,
        );
        let rationale = rationale(&draft, params, confidence, confluence);
        Self {
            id,
            symbol: draft.symbol,
            timeframe: draft.timeframe,
            direction: draft.side,
            entry_price: params.entry,
            stop_loss: params.stop_loss,
            take_profit: params.take_profit,
            trailing_stop: params.trailing_stop,
            position_size: params.position_size,
            confidence,
            risk_reward: params.risk_reward,
            signal_score: draft.score.total,
            pattern_summary: draft.pattern_summary,
            rationale,
            timestamp: draft.evaluated_at,
        }
    }

    pub fn id(&self) -> &SignalId {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn direction(&self) -> SignalSide {
        self.direction
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    pub fn take_profit(&self) -> f64 {
        self.take_profit
    }

    pub fn trailing_stop(&self) -> f64 {
        self.trailing_stop
    }

    pub fn position_size(&self) -> f64 {
        self.position_size
    }

    /// 0–100.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn risk_reward(&self) -> f64 {
        self.risk_reward
    }

    pub fn signal_score(&self) -> f64 {
        self.signal_score
    }

    pub fn pattern_summary(&self) -> &[String] {
        &self.pattern_summary
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Evaluation time: the last candle of the primary window.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {:.4} SL {:.4} TP {:.4} ({:.0}%)",
            self.direction,
            self.symbol,
            self.timeframe,
            self.entry_price,
            self.stop_loss,
            self.take_profit,
            self.confidence
        )
    }
}

fn rationale(
    draft: &SignalDraft,
    params: &OrderParameters,
    confidence: f64,
    confluence: &ConfluenceResult,
) -> String {
    let patterns = if draft.pattern_summary.is_empty() {
        "no aligned patterns".to_string()
    } else {
        draft.pattern_summary.join(", ")
    };
    format!(
        "{side} {symbol} {tf} (confidence {confidence:.0}/100, score {score:+.2}): {patterns}; \
         confluence {confluence}; entry {entry:.4}, stop {sl:.4}, target {tp:.4}, RR {rr:.2}",
        side = draft.side,
        symbol = draft.symbol,
        tf = draft.timeframe,
        score = draft.score.total,
        confluence = confluence.summary(),
        entry = params.entry,
        sl = params.stop_loss,
        tp = params.take_profit,
        rr = params.risk_reward,
    )
}
