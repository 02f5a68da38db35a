//! Event catalog data structures and loading.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;
use thiserror::Error;

use crate::effects::Effects;

/// Events offer between one and three choices; keep them inline.
pub type ChoiceList = SmallVec<[Choice; 3]>;

const CHOICES_MIN: usize = 1;
const CHOICES_MAX: usize = 3;

/// A selectable option within an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    #[serde(default)]
    pub effects: Effects,
    /// Outcome text shown after the choice resolves.
    #[serde(default)]
    pub result: String,
    /// Explanatory annotation; informational only, never read by logic.
    #[serde(default)]
    pub learning: String,
}

/// A presented scenario with descriptive text and its choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub desc: String,
    pub choices: ChoiceList,
}

/// Branch events for the one-shot mid-mission condition check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalEvents {
    pub high_stress: Event,
    pub low_cohesion: Event,
    pub low_morale: Event,
    pub high_fatigue: Event,
    pub stable: Event,
}

/// Finale variants ordered from most to least favorable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinaleEvents {
    pub high: Event,
    pub moderate: Event,
    pub low: Event,
    pub collapse: Event,
}

/// Priority-override events triggered by crossed risk thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerEvents {
    pub high_stress: Event,
    pub low_cohesion: Event,
    pub low_morale: Event,
    pub high_fatigue: Event,
}

/// Container for the full event library of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCatalog {
    pub opening: Vec<Event>,
    pub early: Vec<Event>,
    pub mid_conditional: ConditionalEvents,
    pub mid_random: Vec<Event>,
    pub late: Vec<Event>,
    pub finale: FinaleEvents,
    pub danger: DangerEvents,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse event catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("event '{id}' must offer between 1 and 3 choices (found {count})")]
    ChoiceCount { id: String, count: usize },
    #[error("duplicate event id '{0}'")]
    DuplicateId(String),
    #[error("event with empty id")]
    EmptyId,
}

impl EventCatalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, an event id is
    /// missing or duplicated, or an event's choice count is out of range.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset fails validation, which
    /// indicates a build defect rather than a runtime condition.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(include_str!("../assets/events.json"))
    }

    /// Iterate every event in the catalog, pools and fixed sets alike.
    pub fn iter_all(&self) -> impl Iterator<Item = &Event> {
        self.opening
            .iter()
            .chain(&self.early)
            .chain(&self.mid_random)
            .chain(&self.late)
            .chain([
                &self.mid_conditional.high_stress,
                &self.mid_conditional.low_cohesion,
                &self.mid_conditional.low_morale,
                &self.mid_conditional.high_fatigue,
                &self.mid_conditional.stable,
                &self.finale.high,
                &self.finale.moderate,
                &self.finale.low,
                &self.finale.collapse,
                &self.danger.high_stress,
                &self.danger.low_cohesion,
                &self.danger.low_morale,
                &self.danger.high_fatigue,
            ])
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for event in self.iter_all() {
            if event.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(event.id.as_str()) {
                return Err(CatalogError::DuplicateId(event.id.clone()));
            }
            let count = event.choices.len();
            if !(CHOICES_MIN..=CHOICES_MAX).contains(&count) {
                return Err(CatalogError::ChoiceCount {
                    id: event.id.clone(),
                    count,
                });
            }
        }
        Ok(())
    }
}
