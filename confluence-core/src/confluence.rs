//! Multi-timeframe confluence.
//!
//! Three independent reads are combined into one signed score:
//! - higher-timeframe trend bias (D1, else H4) from SMA stacking,
//! - entry-timeframe momentum (H1), only when volume confirms it,
//! - lower-timeframe structure (M15, else M5) from the last three bars.
//!
//! A missing or short window contributes zero rather than failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{CandleWindow, Direction, Timeframe};
use crate::indicators::{momentum_percent, sma, volume_ratio};

/// Timeframes the confluence engine reads, coarsest first.
pub const CONFLUENCE_TIMEFRAMES: [Timeframe; 5] = [
    Timeframe::D1,
    Timeframe::H4,
    Timeframe::H1,
    Timeframe::M15,
    Timeframe::M5,
];

/// Candle windows for one symbol, keyed by timeframe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeframeSet {
    windows: BTreeMap<Timeframe, CandleWindow>,
}

impl TimeframeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a window under its own timeframe, replacing any previous one.
    pub fn insert(&mut self, window: CandleWindow) {
        self.windows.insert(window.timeframe(), window);
    }

    pub fn with(mut self, window: CandleWindow) -> Self {
        self.insert(window);
        self
    }

    pub fn get(&self, timeframe: Timeframe) -> Option<&CandleWindow> {
        self.windows.get(&timeframe)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.windows.keys().copied()
    }

    /// First of `candidates` whose window holds at least `min_bars` candles.
    fn first_with(&self, candidates: &[Timeframe], min_bars: usize) -> Option<&CandleWindow> {
        candidates
            .iter()
            .filter_map(|tf| self.get(*tf))
            .find(|w| w.len() >= min_bars)
    }
}

/// Directional read with a non-negative strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bias {
    pub direction: Direction,
    pub strength: f64,
}

impl Bias {
    pub fn neutral() -> Self {
        Self {
            direction: Direction::Neutral,
            strength: 0.0,
        }
    }

    pub fn signed(&self) -> f64 {
        self.direction.sign() * self.strength
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub confirmed: bool,
    pub direction: Direction,
    pub strength: f64,
}

impl Confirmation {
    pub fn none() -> Self {
        Self {
            confirmed: false,
            direction: Direction::Neutral,
            strength: 0.0,
        }
    }

    pub fn signed(&self) -> f64 {
        self.direction.sign() * self.strength
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceResult {
    pub htf_bias: Bias,
    pub entry_signal: Bias,
    pub ltf_confirmation: Confirmation,
    pub confluence_score: f64,
}

impl ConfluenceResult {
    pub fn neutral() -> Self {
        Self {
            htf_bias: Bias::neutral(),
            entry_signal: Bias::neutral(),
            ltf_confirmation: Confirmation::none(),
            confluence_score: 0.0,
        }
    }

    /// One-line description for rationales, e.g.
    /// `"HTF Bullish (1.20), entry Neutral, LTF Bullish → +0.73"`.
    pub fn summary(&self) -> String {
        let read = |b: &Bias| {
            if b.direction.is_neutral() {
                b.direction.to_string()
            } else {
                format!("{} ({:.2})", b.direction, b.strength)
            }
        };
        format!(
            "HTF {}, entry {}, LTF {} → {:+.2}",
            read(&self.htf_bias),
            read(&self.entry_signal),
            self.ltf_confirmation.direction,
            self.confluence_score
        )
    }
}

/// Weights and thresholds for the three reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfluenceWeights {
    pub htf: f64,
    pub entry: f64,
    pub ltf: f64,
    /// Minimum bars for a higher-timeframe window to count.
    pub htf_min_bars: usize,
    pub htf_strength_cap: f64,
    /// Volume ratio above which entry momentum becomes directional.
    pub entry_volume_threshold: f64,
    pub entry_strength_cap: f64,
}

impl Default for ConfluenceWeights {
    fn default() -> Self {
        Self {
            htf: 0.40,
            entry: 0.35,
            ltf: 0.25,
            htf_min_bars: 50,
            htf_strength_cap: 5.0,
            entry_volume_threshold: 1.2,
            entry_strength_cap: 3.0,
        }
    }
}

const FAST_SMA: usize = 20;
const SLOW_SMA: usize = 50;
const ENTRY_SPAN: usize = 5;

/// Trend bias from the first of D1/H4 with enough history.
pub fn htf_bias(set: &TimeframeSet, weights: &ConfluenceWeights) -> Bias {
    let min_bars = weights.htf_min_bars.max(SLOW_SMA);
    let Some(window) = set.first_with(&[Timeframe::D1, Timeframe::H4], min_bars) else {
        return Bias::neutral();
    };
    let candles = window.candles();
    let (Some(fast), Some(slow), Some(last)) =
        (sma(candles, FAST_SMA), sma(candles, SLOW_SMA), window.last())
    else {
        return Bias::neutral();
    };
    if slow <= 0.0 {
        return Bias::neutral();
    }

    let close = last.close;
    let direction = if close > fast && fast > slow {
        Direction::Bullish
    } else if close < fast && fast < slow {
        Direction::Bearish
    } else {
        return Bias::neutral();
    };
    let strength = ((close - slow).abs() / slow * 100.0).min(weights.htf_strength_cap);
    Bias {
        direction,
        strength,
    }
}

/// Volume-confirmed momentum on the entry timeframe.
pub fn entry_signal(set: &TimeframeSet, weights: &ConfluenceWeights) -> Bias {
    let Some(window) = set.first_with(&[Timeframe::H1], ENTRY_SPAN + 1) else {
        return Bias::neutral();
    };
    let candles = window.candles();
    let (Some(momentum), Some(ratio)) = (
        momentum_percent(candles, ENTRY_SPAN),
        volume_ratio(candles, ENTRY_SPAN),
    ) else {
        return Bias::neutral();
    };
    if ratio <= weights.entry_volume_threshold || momentum == 0.0 {
        return Bias::neutral();
    }
    Bias {
        direction: Direction::from_sign(momentum),
        strength: (momentum.abs() * ratio).min(weights.entry_strength_cap),
    }
}

/// Three-bar structure on the first of M15/M5 with at least three bars.
pub fn ltf_confirmation(set: &TimeframeSet) -> Confirmation {
    let Some(window) = set.first_with(&[Timeframe::M15, Timeframe::M5], 3) else {
        return Confirmation::none();
    };
    let bars = window.tail(3);
    let rising = bars
        .windows(2)
        .all(|p| p[1].high > p[0].high && p[1].low > p[0].low);
    let falling = bars
        .windows(2)
        .all(|p| p[1].high < p[0].high && p[1].low < p[0].low);

    let direction = if rising {
        Direction::Bullish
    } else if falling {
        Direction::Bearish
    } else {
        return Confirmation::none();
    };
    Confirmation {
        confirmed: true,
        direction,
        strength: 1.0,
    }
}

/// Combine the three reads into a signed confluence score.
pub fn analyze(set: &TimeframeSet, weights: &ConfluenceWeights) -> ConfluenceResult {
    let htf_bias = htf_bias(set, weights);
    let entry_signal = entry_signal(set, weights);
    let ltf_confirmation = ltf_confirmation(set);
    let confluence_score = weights.htf * htf_bias.signed()
        + weights.entry * entry_signal.signed()
        + weights.ltf * ltf_confirmation.signed();
    ConfluenceResult {
        htf_bias,
        entry_signal,
        ltf_confirmation,
        confluence_score,
    }
}
