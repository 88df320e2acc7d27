//! Named weighting strategies
//!
//! A strategy is a fixed weight vector over the four feature scores. The
//! registry is a constant table; [`Strategy::resolve`] never fails and maps
//! unknown names to [`Strategy::SmartBalance`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::features::FeatureScores;

#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    #[error("Unknown strategy: {0} (expected one of: fastest_wins, high_impact, deadline_driven, smart_balance)")]
    Unknown(String),
}

/// Coefficients applied to the feature scores
///
/// They are not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, effort: f64, dependency: f64) -> Self {
        Self {
            urgency,
            importance,
            effort,
            dependency,
        }
    }

    /// Weighted sum of the feature scores
    pub fn combine(&self, features: &FeatureScores) -> f64 {
        self.urgency * features.urgency
            + self.importance * features.importance
            + self.effort * features.effort
            + self.dependency * features.dependency
    }
}

impl Default for Weights {
    fn default() -> Self {
        Strategy::SmartBalance.weights()
    }
}

/// A named prioritization preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Favor quick wins
    FastestWins,
    /// Favor important work
    HighImpact,
    /// Favor what is due soonest
    DeadlineDriven,
    /// Balanced mix of urgency and importance
    #[default]
    SmartBalance,
}

/// Registry of presets: (strategy, name, weights)
const PRESETS: [(Strategy, &str, Weights); 4] = [
    (
        Strategy::FastestWins,
        "fastest_wins",
        Weights::new(0.2, 0.2, 0.5, 0.1),
    ),
    (
        Strategy::HighImpact,
        "high_impact",
        Weights::new(0.2, 0.6, 0.1, 0.1),
    ),
    (
        Strategy::DeadlineDriven,
        "deadline_driven",
        Weights::new(0.7, 0.15, 0.1, 0.05),
    ),
    (
        Strategy::SmartBalance,
        "smart_balance",
        Weights::new(0.35, 0.35, 0.20, 0.10),
    ),
];

impl Strategy {
    /// All strategies in registry order
    pub const ALL: [Strategy; 4] = [
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
        Strategy::SmartBalance,
    ];

    fn preset(&self) -> &'static (Strategy, &'static str, Weights) {
        let idx = match self {
            Strategy::FastestWins => 0,
            Strategy::HighImpact => 1,
            Strategy::DeadlineDriven => 2,
            Strategy::SmartBalance => 3,
        };
        &PRESETS[idx]
    }

    /// Registry name, as accepted by [`Strategy::resolve`]
    pub fn name(&self) -> &'static str {
        self.preset().1
    }

    pub fn weights(&self) -> Weights {
        self.preset().2
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::FastestWins => "Quick wins first: effort dominates",
            Strategy::HighImpact => "Most important work first: importance dominates",
            Strategy::DeadlineDriven => "Nearest deadlines first: urgency dominates",
            Strategy::SmartBalance => "Balanced urgency and importance (default)",
        }
    }

    /// Looks up a strategy by name, falling back to `smart_balance`
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Strategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRESETS
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(strategy, _, _)| *strategy)
            .ok_or_else(|| StrategyError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
