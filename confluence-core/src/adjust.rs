//! Confidence adjustment hook.
//!
//! Adjusters see the classified draft and the market features and return a
//! delta in confidence points. The engine applies the delta before the
//! confidence gate and clamps the result to [0, 100]. Adjusters must be pure:
//! the same inputs always produce the same delta.

use crate::features::MarketFeatures;
use crate::signal::SignalDraft;

pub trait ScoreAdjuster: Send + Sync {
    fn name(&self) -> &str;

    fn confidence_delta(&self, draft: &SignalDraft, features: &MarketFeatures) -> f64;
}

/// Leaves confidence unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralAdjuster;

impl ScoreAdjuster for NeutralAdjuster {
    fn name(&self) -> &str {
        "neutral"
    }

    fn confidence_delta(&self, _draft: &SignalDraft, _features: &MarketFeatures) -> f64 {
        0.0
    }
}

/// Apply an adjuster's delta, ignoring non-finite deltas.
pub fn apply(
    adjuster: &dyn ScoreAdjuster,
    draft: &SignalDraft,
    features: &MarketFeatures,
) -> f64 {
    let base = draft.confidence.total;
    let delta = adjuster.confidence_delta(draft, features);
    if delta.is_finite() {
        (base + delta).clamp(0.0, 100.0)
    } else {
        base
    }
}
