//! Candle granularity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Candle granularity, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown timeframe '{0}' (expected one of 1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w)")]
pub struct TimeframeParseError(pub String);

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
        Timeframe::W1,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
            Timeframe::W1 => "1w",
        }
    }

    pub fn minutes(self) -> i64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1_440,
            Timeframe::W1 => 10_080,
        }
    }

    /// Minimum fractional 5-bar move that counts as displacement on this granularity.
    pub fn displacement_threshold(self) -> f64 {
        match self {
            Timeframe::M1 => 0.003,
            Timeframe::M5 => 0.005,
            Timeframe::M15 => 0.008,
            Timeframe::M30 => 0.010,
            Timeframe::H1 => 0.015,
            Timeframe::H4 => 0.025,
            Timeframe::D1 => 0.035,
            Timeframe::W1 => 0.050,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.label() == normalized)
            .or(match normalized.as_str() {
                "d" | "daily" => Some(Timeframe::D1),
                "60m" => Some(Timeframe::H1),
                "240m" => Some(Timeframe::H4),
                _ => None,
            })
            .ok_or_else(|| TimeframeParseError(s.to_string()))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_labels() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.label().parse::<Timeframe>().unwrap(), tf);
        }
        assert_eq!("daily".parse::<Timeframe>().unwrap(), Timeframe::D1);
        assert_eq!(" 1H ".parse::<Timeframe>().unwrap(), Timeframe::H1);
        assert!("7m".parse::<Timeframe>().is_err());
    }

    #[test]
    fn ordering_is_finest_first() {
        assert!(Timeframe::M5 < Timeframe::H1);
        assert!(Timeframe::H4 < Timeframe::D1);
    }

    #[test]
    fn displacement_threshold_grows_with_granularity() {
        let thresholds: Vec<f64> = Timeframe::ALL
            .iter()
            .map(|tf| tf.displacement_threshold())
            .collect();
        assert!(thresholds.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Timeframe::M5.displacement_threshold(), 0.005);
        assert_eq!(Timeframe::D1.displacement_threshold(), 0.035);
    }

    #[test]
    fn serde_uses_label() {
        assert_eq!(serde_json::to_string(&Timeframe::H4).unwrap(), "\"4h\"");
        let tf: Timeframe = serde_json::from_str("\"15m\"").unwrap();
        assert_eq!(tf, Timeframe::M15);
    }
}
