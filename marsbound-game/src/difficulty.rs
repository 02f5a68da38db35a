//! Difficulty levels and their tuning tables.
//!
//! A difficulty is selected once per run and parameterizes monthly wear,
//! the danger-event thresholds, and the mission-loss thresholds. Loss
//! checks with a `None` threshold are disabled outright; Normal keeps its
//! conflict threshold above the attribute ceiling so the check can never
//! trip there.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
    VeryHard,
    Impossible,
    Insane,
}

impl Difficulty {
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Hard,
        Self::VeryHard,
        Self::Impossible,
        Self::Insane,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::VeryHard => "very-hard",
            Self::Impossible => "impossible",
            Self::Insane => "insane",
        }
    }

    /// Human-readable label for report output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::VeryHard => "Very Hard",
            Self::Impossible => "Impossible",
            Self::Insane => "Insane",
        }
    }

    /// Tuning table for this difficulty.
    #[must_use]
    pub const fn config(self) -> DifficultyConfig {
        match self {
            Self::Normal => DifficultyConfig {
                wear_multiplier: 1.0,
                danger_stress: 90.0,
                danger_cohesion: 10,
                danger_morale: 10,
                danger_fatigue: 95.0,
                lose_stress: 100,
                lose_fatigue: Some(100),
                // Above the attribute ceiling: unreachable on purpose.
                lose_conflict: Some(110),
            },
            Self::Hard => DifficultyConfig {
                wear_multiplier: 1.35,
                danger_stress: 85.0,
                danger_cohesion: 15,
                danger_morale: 15,
                danger_fatigue: 90.0,
                lose_stress: 95,
                lose_fatigue: Some(98),
                lose_conflict: Some(95),
            },
            Self::VeryHard => DifficultyConfig {
                wear_multiplier: 1.5,
                danger_stress: 80.0,
                danger_cohesion: 20,
                danger_morale: 20,
                danger_fatigue: 85.0,
                lose_stress: 90,
                lose_fatigue: Some(95),
                lose_conflict: Some(90),
            },
            Self::Impossible => DifficultyConfig {
                wear_multiplier: 1.75,
                danger_stress: 75.0,
                danger_cohesion: 25,
                danger_morale: 25,
                danger_fatigue: 80.0,
                lose_stress: 85,
                lose_fatigue: Some(92),
                lose_conflict: Some(85),
            },
            Self::Insane => DifficultyConfig {
                wear_multiplier: 2.0,
                danger_stress: 70.0,
                danger_cohesion: 25,
                danger_morale: 25,
                danger_fatigue: 75.0,
                lose_stress: 80,
                lose_fatigue: None,
                lose_conflict: None,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            "very-hard" | "veryhard" => Ok(Self::VeryHard),
            "impossible" => Ok(Self::Impossible),
            "insane" => Ok(Self::Insane),
            _ => Err(()),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

/// Per-run tuning values derived from a [`Difficulty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub wear_multiplier: f32,
    pub danger_stress: f64,
    pub danger_cohesion: i32,
    pub danger_morale: i32,
    pub danger_fatigue: f64,
    pub lose_stress: i32,
    #[serde(default)]
    pub lose_fatigue: Option<i32>,
    #[serde(default)]
    pub lose_conflict: Option<i32>,
}
