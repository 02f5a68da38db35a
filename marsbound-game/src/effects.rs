//! Inspectable effect instructions applied when a choice is taken.
//!
//! Choices carry a flat list of [`EffectOp`] values rather than opaque
//! callbacks, so effects can be validated, serialized alongside the event
//! catalog, and asserted on in tests without executing arbitrary code.

use serde::{Deserialize, Serialize};

use crate::state::MissionState;

/// A mission-wide metric not tied to any one crew member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cohesion,
    Morale,
    ConflictRisk,
    Support,
    SystemHealth,
}

/// A per-crew-member scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewField {
    Stress,
    Fatigue,
    Connection,
}

/// Which crew member(s) an op addresses.
///
/// Derived targets (`MaxStress`, `MaxFatigue`) break ties by first
/// occurrence in crew order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewTarget {
    All,
    Index(usize),
    MaxStress,
    MaxFatigue,
    AllExceptMaxStress,
}

/// A single attribute adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectOp {
    Mission { metric: Metric, delta: i32 },
    Crew { crew: CrewTarget, field: CrewField, delta: i32 },
}

/// Ordered effect list attached to a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Effects(pub Vec<EffectOp>);

/// Crew indexes resolved once per effect application.
///
/// Resolving before any op runs matches the reference behavior where a
/// choice picks its subject up front: ops later in the same list keep
/// addressing the member that ranked highest when the choice was taken,
/// even after an earlier op lowered that member's ranking.
#[derive(Debug, Clone, Copy)]
struct DerivedTargets {
    max_stress: usize,
    max_fatigue: usize,
}

impl DerivedTargets {
    fn resolve(state: &MissionState) -> Self {
        Self {
            max_stress: state.max_stress_index(),
            max_fatigue: state.max_fatigue_index(),
        }
    }
}

impl Effects {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply every op in order. Does not clamp; the caller clamps exactly
    /// once after application.
    pub fn apply(&self, state: &mut MissionState) {
        let derived = DerivedTargets::resolve(state);
        for op in &self.0 {
            op.apply(state, derived);
        }
    }
}

impl EffectOp {
    fn apply(self, state: &mut MissionState, derived: DerivedTargets) {
        match self {
            Self::Mission { metric, delta } => {
                let slot = match metric {
                    Metric::Cohesion => &mut state.cohesion,
                    Metric::Morale => &mut state.morale,
                    Metric::ConflictRisk => &mut state.conflict_risk,
                    Metric::Support => &mut state.support,
                    Metric::SystemHealth => &mut state.system_health,
                };
                *slot += delta;
            }
            Self::Crew { crew, field, delta } => match crew {
                CrewTarget::All => {
                    for member in &mut state.crew {
                        member.adjust(field, delta);
                    }
                }
                CrewTarget::Index(index) => {
                    // Out-of-range targets are ignored rather than panicking.
                    if let Some(member) = state.crew.get_mut(index) {
                        member.adjust(field, delta);
                    }
                }
                CrewTarget::MaxStress => {
                    if let Some(member) = state.crew.get_mut(derived.max_stress) {
                        member.adjust(field, delta);
                    }
                }
                CrewTarget::MaxFatigue => {
                    if let Some(member) = state.crew.get_mut(derived.max_fatigue) {
                        member.adjust(field, delta);
                    }
                }
                CrewTarget::AllExceptMaxStress => {
                    for (index, member) in state.crew.iter_mut().enumerate() {
                        if index != derived.max_stress {
                            member.adjust(field, delta);
                        }
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MissionState;

    fn test_state() -> MissionState {
        MissionState::baseline(17)
    }

    #[test]
    fn mission_op_adjusts_metric() {
        let mut state = test_state();
        let effects = Effects(vec![EffectOp::Mission {
            metric: Metric::Cohesion,
            delta: 3,
        }]);
        effects.apply(&mut state);
        assert_eq!(state.cohesion, 73);
    }

    #[test]
    fn all_target_hits_every_member() {
        let mut state = test_state();
        let before: Vec<i32> = state.crew.iter().map(|m| m.stress).collect();
        let effects = Effects(vec![EffectOp::Crew {
            crew: CrewTarget::All,
            field: CrewField::Stress,
            delta: -5,
        }]);
        effects.apply(&mut state);
        for (member, prev) in state.crew.iter().zip(before) {
            assert_eq!(member.stress, prev - 5);
        }
    }

    #[test]
    fn max_stress_target_ties_break_first() {
        let mut state = test_state();
        for member in &mut state.crew {
            member.stress = 50;
        }
        let effects = Effects(vec![EffectOp::Crew {
            crew: CrewTarget::MaxStress,
            field: CrewField::Stress,
            delta: -10,
        }]);
        effects.apply(&mut state);
        assert_eq!(state.crew[0].stress, 40);
        assert_eq!(state.crew[1].stress, 50);
    }

    #[test]
    fn derived_target_resolved_before_mutation() {
        let mut state = test_state();
        state.crew[1].stress = 90;
        // First op drops the leader below everyone else; the second op
        // must still address the original leader.
        let effects = Effects(vec![
            EffectOp::Crew {
                crew: CrewTarget::MaxStress,
                field: CrewField::Stress,
                delta: -80,
            },
            EffectOp::Crew {
                crew: CrewTarget::MaxStress,
                field: CrewField::Fatigue,
                delta: -4,
            },
        ]);
        let fatigue_before = state.crew[1].fatigue;
        effects.apply(&mut state);
        assert_eq!(state.crew[1].stress, 10);
        assert_eq!(state.crew[1].fatigue, fatigue_before - 4);
    }

    #[test]
    fn all_except_max_stress_spares_the_leader() {
        let mut state = test_state();
        state.crew[2].stress = 99;
        let before: Vec<i32> = state.crew.iter().map(|m| m.fatigue).collect();
        let effects = Effects(vec![EffectOp::Crew {
            crew: CrewTarget::AllExceptMaxStress,
            field: CrewField::Fatigue,
            delta: 3,
        }]);
        effects.apply(&mut state);
        for (index, (member, prev)) in state.crew.iter().zip(before).enumerate() {
            let expected = if index == 2 { prev } else { prev + 3 };
            assert_eq!(member.fatigue, expected);
        }
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut state = test_state();
        let snapshot = state.clone();
        let effects = Effects(vec![EffectOp::Crew {
            crew: CrewTarget::Index(9),
            field: CrewField::Stress,
            delta: 50,
        }]);
        effects.apply(&mut state);
        assert_eq!(state.crew, snapshot.crew);
    }

    #[test]
    fn effect_ops_deserialize_from_catalog_json() {
        let json = r#"[
            { "metric": "conflict_risk", "delta": -2 },
            { "crew": "all", "field": "stress", "delta": -5 },
            { "crew": { "index": 2 }, "field": "fatigue", "delta": 5 },
            { "crew": "max_fatigue", "field": "fatigue", "delta": -10 }
        ]"#;
        let effects: Effects = serde_json::from_str(json).unwrap();
        assert_eq!(effects.0.len(), 4);
        assert_eq!(
            effects.0[0],
            EffectOp::Mission {
                metric: Metric::ConflictRisk,
                delta: -2
            }
        );
        assert_eq!(
            effects.0[2],
            EffectOp::Crew {
                crew: CrewTarget::Index(2),
                field: CrewField::Fatigue,
                delta: 5
            }
        );
    }
}
