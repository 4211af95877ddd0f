//! Kill-zone analysis: which trading session is active at a UTC instant.
//!
//! Windows are half-open `[start, end)` in minutes after midnight UTC.
//! Overlaps are checked first so the strongest matching zone wins.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named session windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KillZone {
    LondonNewYorkOverlap,
    LondonAsianOverlap,
    London,
    NewYork,
    Asian,
}

/// Session strength, ordered weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStrength {
    Low,
    Medium,
    High,
    Maximum,
}

const fn hm(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

impl KillZone {
    /// Evaluation order: overlaps before their parent sessions.
    pub const ALL: [KillZone; 5] = [
        KillZone::LondonNewYorkOverlap,
        KillZone::LondonAsianOverlap,
        KillZone::London,
        KillZone::NewYork,
        KillZone::Asian,
    ];

    /// `(start, end)` in minutes after midnight UTC. `end < start` wraps midnight.
    pub fn window(self) -> (u32, u32) {
        match self {
            KillZone::LondonNewYorkOverlap => (hm(13, 30), hm(16, 0)),
            KillZone::LondonAsianOverlap => (hm(7, 0), hm(9, 0)),
            KillZone::London => (hm(7, 0), hm(10, 0)),
            KillZone::NewYork => (hm(13, 30), hm(16, 30)),
            KillZone::Asian => (hm(23, 0), hm(1, 0)),
        }
    }

    pub fn strength(self) -> SessionStrength {
        match self {
            KillZone::LondonNewYorkOverlap | KillZone::LondonAsianOverlap => {
                SessionStrength::Maximum
            }
            KillZone::London | KillZone::NewYork => SessionStrength::High,
            KillZone::Asian => SessionStrength::Medium,
        }
    }

    pub fn contains(self, minute_of_day: u32) -> bool {
        let (start, end) = self.window();
        if start <= end {
            (start..end).contains(&minute_of_day)
        } else {
            minute_of_day >= start || minute_of_day < end
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KillZone::LondonNewYorkOverlap => "London-New York overlap",
            KillZone::LondonAsianOverlap => "London-Asian overlap",
            KillZone::London => "London",
            KillZone::NewYork => "New York",
            KillZone::Asian => "Asian",
        }
    }
}

impl fmt::Display for KillZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl SessionStrength {
    /// Scale applied to the session-momentum contribution.
    pub fn momentum_multiplier(self) -> f64 {
        match self {
            SessionStrength::Maximum => 1.0,
            SessionStrength::High => 0.75,
            SessionStrength::Medium => 0.5,
            SessionStrength::Low => 0.0,
        }
    }

    /// Confidence points awarded for trading inside this session.
    pub fn confidence_bonus(self) -> f64 {
        match self {
            SessionStrength::Maximum => 15.0,
            SessionStrength::High => 10.0,
            SessionStrength::Medium => 5.0,
            SessionStrength::Low => 0.0,
        }
    }
}

impl fmt::Display for SessionStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStrength::Low => "LOW",
            SessionStrength::Medium => "MEDIUM",
            SessionStrength::High => "HIGH",
            SessionStrength::Maximum => "MAXIMUM",
        };
        f.write_str(s)
    }
}

/// Score contributed to the signal score per session strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionScores {
    pub maximum: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for SessionScores {
    fn default() -> Self {
        Self {
            maximum: 0.5,
            high: 0.3,
            medium: 0.2,
        }
    }
}

impl SessionScores {
    pub fn for_strength(&self, strength: SessionStrength) -> f64 {
        match strength {
            SessionStrength::Maximum => self.maximum,
            SessionStrength::High => self.high,
            SessionStrength::Medium => self.medium,
            SessionStrength::Low => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub active: bool,
    pub zone: Option<KillZone>,
    /// Unsigned magnitude; scoring applies the prevailing direction's sign.
    pub score: f64,
    pub strength: SessionStrength,
}

impl SessionAnalysis {
    pub fn inactive() -> Self {
        Self {
            active: false,
            zone: None,
            score: 0.0,
            strength: SessionStrength::Low,
        }
    }
}

/// Analyse `at` with the default session scores.
pub fn analyze(at: DateTime<Utc>) -> SessionAnalysis {
    analyze_with(at, &SessionScores::default())
}

pub fn analyze_with(at: DateTime<Utc>, scores: &SessionScores) -> SessionAnalysis {
    let minute = hm(at.hour(), at.minute());
    match KillZone::ALL.into_iter().find(|z| z.contains(minute)) {
        Some(zone) => {
            let strength = zone.strength();
            SessionAnalysis {
                active: true,
                zone: Some(zone),
                score: scores.for_strength(strength),
                strength,
            }
        }
        None => SessionAnalysis::inactive(),
    }
}
