//! Automated choice policies for driving missions without a player.

use clap::ValueEnum;
use marsbound_game::{CrewField, CrewTarget, EffectOp, Event, Metric, MissionState};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// How the harness picks among an event's choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChoicePolicy {
    /// Always take the first listed choice.
    First,
    /// Pick uniformly at random.
    Random,
    /// Favor the choice that best relieves the crew right now.
    Caretaker,
}

impl ChoicePolicy {
    pub fn pick(self, event: &Event, state: &MissionState, rng: &mut ChaCha20Rng) -> usize {
        let count = event.choices.len();
        if count <= 1 {
            return 0;
        }
        match self {
            Self::First => 0,
            Self::Random => rng.gen_range(0..count),
            Self::Caretaker => best_relief_index(event, state),
        }
    }
}

/// Score each choice by how much relief its effects promise, weighted
/// toward whichever pressure is currently worst. Ties keep the earliest
/// choice, matching how a cautious player reads top to bottom.
fn best_relief_index(event: &Event, state: &MissionState) -> usize {
    let stress_weight = if state.mean_stress() >= 60.0 { 3 } else { 1 };
    let fatigue_weight = if state.mean_fatigue() >= 60.0 { 3 } else { 1 };

    let mut best_index = 0;
    let mut best_score = i32::MIN;
    for (index, choice) in event.choices.iter().enumerate() {
        let score = choice
            .effects
            .0
            .iter()
            .map(|op| score_op(op, stress_weight, fatigue_weight))
            .sum::<i32>();
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }
    best_index
}

fn score_op(op: &EffectOp, stress_weight: i32, fatigue_weight: i32) -> i32 {
    match op {
        EffectOp::Mission { metric, delta } => match metric {
            Metric::ConflictRisk => -delta,
            Metric::Cohesion | Metric::Morale => *delta,
            // Spent support usually buys relief elsewhere; weigh it lightly.
            Metric::Support | Metric::SystemHealth => delta / 2,
        },
        EffectOp::Crew { crew, field, delta } => {
            let breadth = match crew {
                CrewTarget::All => 4,
                CrewTarget::AllExceptMaxStress => 3,
                CrewTarget::Index(_) | CrewTarget::MaxStress | CrewTarget::MaxFatigue => 1,
            };
            let weight = match field {
                CrewField::Stress => stress_weight,
                CrewField::Fatigue => fatigue_weight,
                CrewField::Connection => 1,
            };
            -delta * breadth * weight
        }
    }
}
