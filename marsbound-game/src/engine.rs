//! Turn controller: orchestrates one simulated month per exchange.
//!
//! The engine is an explicit session value owned by the caller; there is
//! no process-wide state. Control flows `AwaitingChoice` -> `Resolved` ->
//! next month, until the win or loss evaluation ends the run.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CONFLICT_MONTHLY_CREEP, DEFAULT_RESULT_TEXT, MORALE_MONTHLY_DECAY, WEAR_ROLL_MAX,
    WEAR_ROLL_MIN,
};
use crate::data::{CatalogError, Event, EventCatalog};
use crate::difficulty::{Difficulty, DifficultyConfig};
use crate::report::{DeltaReport, Snapshot};
use crate::selector::{PhaseSchedule, select_event};
use crate::state::MissionState;

/// Where the controller sits within the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingChoice,
    Resolved,
    GameOver,
}

/// First loss condition detected, in fixed priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    CohesionCollapse,
    MoraleDepleted,
    SupportExhausted,
    CrewStress { name: String },
    CrewFatigue { name: String },
    ConflictSpike,
}

impl LossReason {
    /// Stable key for aggregating losses across runs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CohesionCollapse => "cohesion-collapse",
            Self::MoraleDepleted => "morale-depleted",
            Self::SupportExhausted => "support-exhausted",
            Self::CrewStress { .. } => "crew-stress",
            Self::CrewFatigue { .. } => "crew-fatigue",
            Self::ConflictSpike => "conflict-spike",
        }
    }
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CohesionCollapse => f.write_str("Crew cohesion collapsed."),
            Self::MoraleDepleted => f.write_str("Crew morale depleted."),
            Self::SupportExhausted => f.write_str("NASA support exhausted."),
            Self::CrewStress { name } => {
                write!(f, "{name}'s stress reached critical levels.")
            }
            Self::CrewFatigue { name } => {
                write!(f, "{name}'s fatigue reached critical levels.")
            }
            Self::ConflictSpike => f.write_str("Conflict risk spiked beyond safe limits."),
        }
    }
}

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionOutcome {
    Victory,
    Defeat(LossReason),
}

impl fmt::Display for MissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory => {
                f.write_str("Mission complete. Your crew arrives at Mars with manageable strain.")
            }
            Self::Defeat(reason) => reason.fmt(f),
        }
    }
}

/// Outcome of a resolved choice, returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOutcome {
    pub result: String,
    pub learning: String,
    pub delta: DeltaReport,
    pub game_over: Option<MissionOutcome>,
}

/// One mission run: state, catalog, difficulty, and turn phase.
#[derive(Debug, Clone)]
pub struct MissionEngine {
    catalog: EventCatalog,
    difficulty: DifficultyConfig,
    schedule: PhaseSchedule,
    state: MissionState,
    phase: TurnPhase,
    current: Option<Event>,
    outcome: Option<MissionOutcome>,
}

impl MissionEngine {
    /// Start a fresh run under the reference schedule. Month 1 begins
    /// immediately: wear is applied and the first event selected.
    #[must_use]
    pub fn new_run(catalog: EventCatalog, difficulty: Difficulty, seed: u64) -> Self {
        Self::with_schedule(catalog, difficulty, PhaseSchedule::default(), seed)
    }

    /// Start a fresh run with an explicit phase schedule.
    #[must_use]
    pub fn with_schedule(
        catalog: EventCatalog,
        difficulty: Difficulty,
        schedule: PhaseSchedule,
        seed: u64,
    ) -> Self {
        let state = MissionState::new_run(&catalog, schedule.total_months, seed);
        info!(
            "new run: difficulty {} seed {seed} over {} months",
            difficulty.label(),
            schedule.total_months
        );
        let mut engine = Self {
            catalog,
            difficulty: difficulty.config(),
            schedule,
            state,
            phase: TurnPhase::Resolved,
            current: None,
            outcome: None,
        };
        engine.start_turn();
        engine
    }

    /// Start a fresh run using the catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog fails validation.
    pub fn with_default_catalog(difficulty: Difficulty, seed: u64) -> Result<Self, CatalogError> {
        Ok(Self::new_run(
            EventCatalog::load_from_static()?,
            difficulty,
            seed,
        ))
    }

    /// The event awaiting a choice, if any.
    #[must_use]
    pub fn current_event(&self) -> Option<&Event> {
        match self.phase {
            TurnPhase::AwaitingChoice => self.current.as_ref(),
            _ => None,
        }
    }

    /// Read-only view of the mission state for rendering.
    #[must_use]
    pub const fn snapshot(&self) -> &MissionState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&MissionOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over
    }

    /// Apply the indexed choice of the current event.
    ///
    /// Returns `None` without touching any state when no choice is being
    /// awaited or the index is out of range.
    pub fn choose_option(&mut self, index: usize) -> Option<ChoiceOutcome> {
        if self.phase != TurnPhase::AwaitingChoice || self.state.is_over {
            return None;
        }
        let choice = self.current.as_ref()?.choices.get(index)?.clone();

        let before = Snapshot::of(&self.state);
        choice.effects.apply(&mut self.state);
        self.state.clamp();
        let delta = DeltaReport::between(&before, &Snapshot::of(&self.state));

        let result = if choice.result.is_empty() {
            DEFAULT_RESULT_TEXT.to_string()
        } else {
            choice.result
        };

        if let Some(reason) = self.check_loss() {
            let outcome = MissionOutcome::Defeat(reason);
            self.finish(outcome.clone());
            return Some(ChoiceOutcome {
                result,
                learning: choice.learning,
                delta,
                game_over: Some(outcome),
            });
        }

        self.phase = TurnPhase::Resolved;
        Some(ChoiceOutcome {
            result,
            learning: choice.learning,
            delta,
            game_over: None,
        })
    }

    /// Advance to the next month. No-op outside `Resolved`.
    pub fn advance_month(&mut self) {
        if self.phase != TurnPhase::Resolved || self.state.is_over {
            return;
        }
        self.state.month += 1;
        self.current = None;
        self.start_turn();
    }

    fn start_turn(&mut self) {
        if self.state.month > self.schedule.total_months {
            self.finish(MissionOutcome::Victory);
            return;
        }

        self.apply_wear();
        self.state.clamp();
        if let Some(reason) = self.check_loss() {
            self.finish(MissionOutcome::Defeat(reason));
            return;
        }

        let event = select_event(
            &mut self.state,
            &self.catalog,
            &self.difficulty,
            &self.schedule,
        );
        debug!("month {}: awaiting choice on '{}'", self.state.month, event.id);
        self.current = Some(event);
        self.phase = TurnPhase::AwaitingChoice;
    }

    /// Monthly wear: stress and fatigue creep for every member, plus the
    /// fixed morale decay and conflict-risk creep, all difficulty-scaled.
    fn apply_wear(&mut self) {
        let mult = self.difficulty.wear_multiplier;
        let Some(mut rng) = self.state.rng.take() else {
            return;
        };
        for member in &mut self.state.crew {
            member.stress += scaled_roll(rng.gen_range(WEAR_ROLL_MIN..=WEAR_ROLL_MAX), mult);
            member.fatigue += scaled_roll(rng.gen_range(WEAR_ROLL_MIN..=WEAR_ROLL_MAX), mult);
        }
        self.state.rng = Some(rng);

        self.state.morale -= scaled_floor_one(MORALE_MONTHLY_DECAY, mult);
        self.state.conflict_risk += scaled_floor_one(CONFLICT_MONTHLY_CREEP, mult);
    }

    /// Loss conditions in fixed priority order; the first trip wins.
    fn check_loss(&self) -> Option<LossReason> {
        let state = &self.state;
        let cfg = &self.difficulty;
        if state.cohesion <= 0 {
            return Some(LossReason::CohesionCollapse);
        }
        if state.morale <= 0 {
            return Some(LossReason::MoraleDepleted);
        }
        if state.support <= 0 {
            return Some(LossReason::SupportExhausted);
        }
        if let Some(member) = state.crew.iter().find(|m| m.stress >= cfg.lose_stress) {
            return Some(LossReason::CrewStress {
                name: member.name.clone(),
            });
        }
        if let Some(limit) = cfg.lose_fatigue
            && let Some(member) = state.crew.iter().find(|m| m.fatigue >= limit)
        {
            return Some(LossReason::CrewFatigue {
                name: member.name.clone(),
            });
        }
        if let Some(limit) = cfg.lose_conflict
            && state.conflict_risk >= limit
        {
            return Some(LossReason::ConflictSpike);
        }
        None
    }

    fn finish(&mut self, outcome: MissionOutcome) {
        info!("month {}: {outcome}", self.state.month);
        self.state.is_over = true;
        self.current = None;
        self.phase = TurnPhase::GameOver;
        self.outcome = Some(outcome);
    }
}

fn scaled_roll(roll: i32, mult: f32) -> i32 {
    (roll as f32 * mult).round() as i32
}

fn scaled_floor_one(base: f32, mult: f32) -> i32 {
    ((base * mult).round() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Snapshot;

    fn engine(difficulty: Difficulty, seed: u64) -> MissionEngine {
        MissionEngine::with_default_catalog(difficulty, seed).unwrap()
    }

    #[test]
    fn new_run_awaits_a_choice_at_month_one() {
        let engine = engine(Difficulty::Normal, 1);
        assert_eq!(engine.phase(), TurnPhase::AwaitingChoice);
        assert_eq!(engine.snapshot().month, 1);
        let event = engine.current_event().expect("event presented");
        assert!(event.id.starts_with("opening"));
        assert!(engine.snapshot().is_clamped());
    }

    #[test]
    fn choose_option_rejects_out_of_range_index() {
        let mut engine = engine(Difficulty::Normal, 2);
        let before = Snapshot::of(engine.snapshot());
        assert!(engine.choose_option(99).is_none());
        assert_eq!(Snapshot::of(engine.snapshot()), before);
        assert_eq!(engine.phase(), TurnPhase::AwaitingChoice);
    }

    #[test]
    fn choose_option_is_noop_outside_awaiting_choice() {
        let mut engine = engine(Difficulty::Normal, 3);
        engine.choose_option(0).expect("first choice resolves");
        assert_eq!(engine.phase(), TurnPhase::Resolved);
        let before = Snapshot::of(engine.snapshot());
        assert!(engine.choose_option(0).is_none());
        assert_eq!(Snapshot::of(engine.snapshot()), before);
    }

    #[test]
    fn advance_month_is_noop_while_awaiting_choice() {
        let mut engine = engine(Difficulty::Normal, 4);
        engine.advance_month();
        assert_eq!(engine.snapshot().month, 1);
        assert_eq!(engine.phase(), TurnPhase::AwaitingChoice);
    }

    #[test]
    fn resolve_then_advance_moves_to_month_two() {
        let mut engine = engine(Difficulty::Normal, 5);
        let outcome = engine.choose_option(0).expect("choice resolves");
        assert!(outcome.game_over.is_none());
        assert!(!outcome.result.is_empty());
        engine.advance_month();
        assert_eq!(engine.snapshot().month, 2);
        assert_eq!(engine.phase(), TurnPhase::AwaitingChoice);
    }

    #[test]
    fn loss_priority_reports_cohesion_before_morale() {
        let mut engine = engine(Difficulty::Normal, 6);
        engine.state.cohesion = 0;
        engine.state.morale = 0;
        let outcome = engine.choose_option(0).expect("choice resolves");
        assert_eq!(
            outcome.game_over,
            Some(MissionOutcome::Defeat(LossReason::CohesionCollapse))
        );
        assert_eq!(engine.phase(), TurnPhase::GameOver);
        assert!(engine.is_over());
    }

    #[test]
    fn crew_stress_loss_names_the_member() {
        // Insane trips crew stress at 80; no opening choice sheds enough
        // to bring 99 back under it.
        let mut engine = engine(Difficulty::Insane, 7);
        engine.state.crew[2].stress = 99;
        let outcome = engine.choose_option(0).expect("choice resolves");
        assert_eq!(
            outcome.game_over,
            Some(MissionOutcome::Defeat(LossReason::CrewStress {
                name: "Astronaut C (Engineer)".to_string()
            }))
        );
    }

    #[test]
    fn terminal_state_accepts_no_further_mutation() {
        let mut engine = engine(Difficulty::Normal, 8);
        engine.state.support = 0;
        engine
            .choose_option(0)
            .expect("choice resolves into game over");
        assert!(engine.is_over());
        assert!(engine.current_event().is_none());
        let before = Snapshot::of(engine.snapshot());
        assert!(engine.choose_option(0).is_none());
        engine.advance_month();
        assert_eq!(Snapshot::of(engine.snapshot()), before);
        assert_eq!(
            engine.outcome(),
            Some(&MissionOutcome::Defeat(LossReason::SupportExhausted))
        );
    }

    #[test]
    fn insane_wear_outpaces_normal_wear() {
        let normal = engine(Difficulty::Normal, 9);
        let insane = engine(Difficulty::Insane, 9);
        let sum = |e: &MissionEngine| {
            e.snapshot()
                .crew
                .iter()
                .map(|m| m.stress + m.fatigue)
                .sum::<i32>()
        };
        // Same seed, same rolls; only the multiplier differs.
        assert!(sum(&insane) > sum(&normal));
    }

    #[test]
    fn loss_reason_messages_match_reference_text() {
        assert_eq!(
            LossReason::CohesionCollapse.to_string(),
            "Crew cohesion collapsed."
        );
        assert_eq!(
            LossReason::CrewFatigue {
                name: "Astronaut A (Pilot)".to_string()
            }
            .to_string(),
            "Astronaut A (Pilot)'s fatigue reached critical levels."
        );
    }
}
