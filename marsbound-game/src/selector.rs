//! Event selection policy across mission phases.
//!
//! Selection runs a fixed rule ladder each month: the danger check always
//! preempts, the phase rules are mutually exclusive by month range, and a
//! pool exhausted inside its range falls through to the stable fallback.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{
    FINALE_HIGH_CONFLICT, FINALE_HIGH_CORE, FINALE_HIGH_FATIGUE, FINALE_HIGH_STRESS,
    FINALE_LOW_CORE, FINALE_MODERATE_CORE, FINALE_MODERATE_STRESS, MID_COHESION_LOW,
    MID_FATIGUE_HIGH, MID_MORALE_LOW, MID_STRESS_HIGH,
};
use crate::data::{Event, EventCatalog};
use crate::difficulty::DifficultyConfig;
use crate::state::{MissionState, PoolKind};

/// Month ranges for each selection phase. Defaults reproduce the
/// 17-month reference mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSchedule {
    #[serde(default = "PhaseSchedule::default_total_months")]
    pub total_months: u32,
    #[serde(default = "PhaseSchedule::default_early_start")]
    pub early_start: u32,
    #[serde(default = "PhaseSchedule::default_early_end")]
    pub early_end: u32,
    #[serde(default = "PhaseSchedule::default_mid_conditional_month")]
    pub mid_conditional_month: u32,
    #[serde(default = "PhaseSchedule::default_mid_random_start")]
    pub mid_random_start: u32,
    #[serde(default = "PhaseSchedule::default_mid_random_end")]
    pub mid_random_end: u32,
    #[serde(default = "PhaseSchedule::default_late_start")]
    pub late_start: u32,
    #[serde(default = "PhaseSchedule::default_late_end")]
    pub late_end: u32,
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self {
            total_months: Self::default_total_months(),
            early_start: Self::default_early_start(),
            early_end: Self::default_early_end(),
            mid_conditional_month: Self::default_mid_conditional_month(),
            mid_random_start: Self::default_mid_random_start(),
            mid_random_end: Self::default_mid_random_end(),
            late_start: Self::default_late_start(),
            late_end: Self::default_late_end(),
        }
    }
}

impl PhaseSchedule {
    const fn default_total_months() -> u32 {
        17
    }

    const fn default_early_start() -> u32 {
        2
    }

    const fn default_early_end() -> u32 {
        5
    }

    const fn default_mid_conditional_month() -> u32 {
        6
    }

    const fn default_mid_random_start() -> u32 {
        7
    }

    const fn default_mid_random_end() -> u32 {
        11
    }

    const fn default_late_start() -> u32 {
        12
    }

    const fn default_late_end() -> u32 {
        16
    }
}

/// Pick the event for the current month.
///
/// Mutates the run's pools and one-shot flags; never fails — the stable
/// branch backstops every exhausted rule.
pub fn select_event(
    state: &mut MissionState,
    catalog: &EventCatalog,
    difficulty: &DifficultyConfig,
    schedule: &PhaseSchedule,
) -> Event {
    if let Some(event) = danger_event(state, catalog, difficulty) {
        debug!("month {}: danger override '{}'", state.month, event.id);
        return event;
    }

    if !state.used_opening && state.month == 1 {
        state.used_opening = true;
        if let Some(event) = state.pools.take(PoolKind::Opening) {
            debug!("month {}: opening '{}'", state.month, event.id);
            return event;
        }
    }

    if (schedule.early_start..=schedule.early_end).contains(&state.month)
        && let Some(event) = state.pools.take(PoolKind::Early)
    {
        debug!("month {}: early pool '{}'", state.month, event.id);
        return event;
    }

    if !state.used_mid_conditional && state.month == schedule.mid_conditional_month {
        state.used_mid_conditional = true;
        let event = mid_conditional_event(state, catalog);
        debug!("month {}: mid-conditional '{}'", state.month, event.id);
        return event;
    }

    if (schedule.mid_random_start..=schedule.mid_random_end).contains(&state.month)
        && let Some(event) = state.pools.take(PoolKind::MidRandom)
    {
        debug!("month {}: mid-random pool '{}'", state.month, event.id);
        return event;
    }

    if (schedule.late_start..=schedule.late_end).contains(&state.month)
        && let Some(event) = state.pools.take(PoolKind::Late)
    {
        debug!("month {}: late pool '{}'", state.month, event.id);
        return event;
    }

    if state.month >= schedule.total_months {
        let event = finale_event(state, catalog);
        debug!("month {}: finale '{}'", state.month, event.id);
        return event;
    }

    debug!("month {}: fallback to stable branch", state.month);
    catalog.mid_conditional.stable.clone()
}

/// Danger thresholds in priority order: stress, cohesion, morale, fatigue.
fn danger_event(
    state: &MissionState,
    catalog: &EventCatalog,
    difficulty: &DifficultyConfig,
) -> Option<Event> {
    if state.mean_stress() >= difficulty.danger_stress {
        return Some(catalog.danger.high_stress.clone());
    }
    if state.cohesion <= difficulty.danger_cohesion {
        return Some(catalog.danger.low_cohesion.clone());
    }
    if state.morale <= difficulty.danger_morale {
        return Some(catalog.danger.low_morale.clone());
    }
    if state.mean_fatigue() >= difficulty.danger_fatigue {
        return Some(catalog.danger.high_fatigue.clone());
    }
    None
}

fn mid_conditional_event(state: &MissionState, catalog: &EventCatalog) -> Event {
    let branches = &catalog.mid_conditional;
    if state.mean_stress() >= MID_STRESS_HIGH {
        return branches.high_stress.clone();
    }
    if state.cohesion <= MID_COHESION_LOW {
        return branches.low_cohesion.clone();
    }
    if state.morale <= MID_MORALE_LOW {
        return branches.low_morale.clone();
    }
    if state.mean_fatigue() >= MID_FATIGUE_HIGH {
        return branches.high_fatigue.clone();
    }
    branches.stable.clone()
}

/// Composite end-state evaluation; first matching tier wins, ordered from
/// most to least favorable.
fn finale_event(state: &MissionState, catalog: &EventCatalog) -> Event {
    let mean_stress = state.mean_stress();
    let mean_fatigue = state.mean_fatigue();
    let core = f64::from(state.cohesion + state.morale + state.support + state.system_health) / 4.0;

    if core >= FINALE_HIGH_CORE
        && mean_stress <= FINALE_HIGH_STRESS
        && mean_fatigue <= FINALE_HIGH_FATIGUE
        && state.conflict_risk <= FINALE_HIGH_CONFLICT
    {
        return catalog.finale.high.clone();
    }
    if core >= FINALE_MODERATE_CORE && mean_stress <= FINALE_MODERATE_STRESS {
        return catalog.finale.moderate.clone();
    }
    if core >= FINALE_LOW_CORE {
        return catalog.finale.low.clone();
    }
    catalog.finale.collapse.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::state::MissionState;

    fn catalog() -> EventCatalog {
        EventCatalog::load_from_static().unwrap()
    }

    fn run_state(catalog: &EventCatalog, seed: u64) -> MissionState {
        MissionState::new_run(catalog, 17, seed)
    }

    #[test]
    fn danger_check_preempts_every_phase() {
        let catalog = catalog();
        let difficulty = Difficulty::Normal.config();
        let schedule = PhaseSchedule::default();
        for month in [1, 4, 6, 9, 14, 17] {
            let mut state = run_state(&catalog, 11);
            state.month = month;
            for member in &mut state.crew {
                member.stress = 95;
            }
            let event = select_event(&mut state, &catalog, &difficulty, &schedule);
            assert_eq!(event.id, catalog.danger.high_stress.id, "month {month}");
        }
    }

    #[test]
    fn danger_priority_follows_stress_cohesion_morale_fatigue() {
        let catalog = catalog();
        let difficulty = Difficulty::Normal.config();
        let mut state = run_state(&catalog, 3);
        state.cohesion = 5;
        state.morale = 5;
        for member in &mut state.crew {
            member.fatigue = 99;
        }
        let event = danger_event(&state, &catalog, &difficulty).unwrap();
        assert_eq!(event.id, catalog.danger.low_cohesion.id);
    }

    #[test]
    fn opening_fires_exactly_once_and_only_at_month_one() {
        let catalog = catalog();
        let difficulty = Difficulty::Normal.config();
        let schedule = PhaseSchedule::default();
        let mut state = run_state(&catalog, 5);

        let first = select_event(&mut state, &catalog, &difficulty, &schedule);
        assert!(state.used_opening);
        assert!(catalog.opening.iter().any(|e| e.id == first.id));

        // Still month 1: the opening rule must not fire again.
        let second = select_event(&mut state, &catalog, &difficulty, &schedule);
        assert!(catalog.opening.iter().all(|e| e.id != second.id));
    }

    #[test]
    fn mid_conditional_prefers_stress_over_other_branches() {
        let catalog = catalog();
        let difficulty = Difficulty::Normal.config();
        let schedule = PhaseSchedule::default();
        let mut state = run_state(&catalog, 5);
        state.month = 6;
        for member in &mut state.crew {
            member.stress = 75;
        }
        state.cohesion = 50;
        state.morale = 50;
        let event = select_event(&mut state, &catalog, &difficulty, &schedule);
        assert_eq!(event.id, catalog.mid_conditional.high_stress.id);
        assert!(state.used_mid_conditional);
    }

    #[test]
    fn mid_conditional_is_stable_when_nothing_trips() {
        let catalog = catalog();
        let state = MissionState::baseline(17);
        let event = mid_conditional_event(&state, &catalog);
        assert_eq!(event.id, catalog.mid_conditional.stable.id);
    }

    #[test]
    fn finale_tiers_degrade_in_order() {
        let catalog = catalog();
        let mut state = MissionState::baseline(17);
        state.month = 17;
        state.cohesion = 90;
        state.morale = 90;
        state.support = 90;
        state.system_health = 90;
        state.conflict_risk = 10;
        for member in &mut state.crew {
            member.stress = 30;
            member.fatigue = 30;
        }
        assert_eq!(finale_event(&state, &catalog).id, catalog.finale.high.id);

        // Degrade one input: drops exactly one tier.
        for member in &mut state.crew {
            member.stress = 50;
        }
        assert_eq!(finale_event(&state, &catalog).id, catalog.finale.moderate.id);

        state.cohesion = 20;
        state.morale = 20;
        state.support = 50;
        state.system_health = 50;
        assert_eq!(finale_event(&state, &catalog).id, catalog.finale.low.id);

        state.support = 20;
        state.system_health = 20;
        assert_eq!(finale_event(&state, &catalog).id, catalog.finale.collapse.id);
    }

    #[test]
    fn exhausted_pool_falls_back_to_stable_branch() {
        let catalog = catalog();
        let difficulty = Difficulty::Normal.config();
        let schedule = PhaseSchedule::default();
        let mut state = run_state(&catalog, 9);
        state.month = 3;
        state.pools.early.clear();
        let event = select_event(&mut state, &catalog, &difficulty, &schedule);
        assert_eq!(event.id, catalog.mid_conditional.stable.id);
    }
}
