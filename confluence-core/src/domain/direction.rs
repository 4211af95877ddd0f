//! Directional enums: pattern/bias direction and the two-state signal side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a pattern observation or timeframe bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    /// +1 for bullish, -1 for bearish, 0 for neutral.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Bullish => 1.0,
            Direction::Bearish => -1.0,
            Direction::Neutral => 0.0,
        }
    }

    /// Direction implied by the sign of a score.
    pub fn from_sign(value: f64) -> Self {
        if value > 0.0 {
            Direction::Bullish
        } else if value < 0.0 {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }

    pub fn is_neutral(self) -> bool {
        matches!(self, Direction::Neutral)
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
            Direction::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Side of an emitted signal. There is deliberately no HOLD variant:
/// the absence of a signal is expressed by not emitting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalSide {
    Buy,
    Sell,
}

impl SignalSide {
    pub fn sign(self) -> f64 {
        match self {
            SignalSide::Buy => 1.0,
            SignalSide::Sell => -1.0,
        }
    }

    /// The pattern direction that supports this side.
    pub fn direction(self) -> Direction {
        match self {
            SignalSide::Buy => Direction::Bullish,
            SignalSide::Sell => Direction::Bearish,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalSide::Buy => "BUY",
            SignalSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_sign_roundtrip() {
        for d in [Direction::Bullish, Direction::Bearish, Direction::Neutral] {
            assert_eq!(Direction::from_sign(d.sign()), d);
        }
    }

    #[test]
    fn side_maps_to_direction() {
        assert_eq!(SignalSide::Buy.direction(), Direction::Bullish);
        assert_eq!(SignalSide::Sell.direction(), Direction::Bearish);
    }

    #[test]
    fn side_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&SignalSide::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&SignalSide::Sell).unwrap(), "\"SELL\"");
        assert_eq!(
            serde_json::to_string(&Direction::Neutral).unwrap(),
            "\"NEUTRAL\""
        );
    }
}
