//! Mission state: crew roster, mission-wide metrics, and phase pools.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_COHESION, BASE_CONFLICT_RISK, BASE_MORALE, BASE_SUPPORT, BASE_SYSTEM_HEALTH, STAT_MAX,
    STAT_MIN,
};
use crate::data::{Event, EventCatalog};
use crate::effects::CrewField;

/// Role-specific seed values: id, display name, stress, fatigue, connection.
const CREW_SEEDS: [(&str, &str, i32, i32, i32); 4] = [
    ("A", "Astronaut A (Pilot)", 30, 30, 60),
    ("B", "Astronaut B (Scientist)", 35, 25, 55),
    ("C", "Astronaut C (Engineer)", 25, 35, 50),
    ("D", "Astronaut D (Medical/Psych Specialist)", 30, 30, 65),
];

/// One of the four simulated crew members. Created at run start and never
/// destroyed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: String,
    pub name: String,
    pub stress: i32,
    pub fatigue: i32,
    pub connection: i32,
}

impl CrewMember {
    pub(crate) fn adjust(&mut self, field: CrewField, delta: i32) {
        let slot = match field {
            CrewField::Stress => &mut self.stress,
            CrewField::Fatigue => &mut self.fatigue,
            CrewField::Connection => &mut self.connection,
        };
        *slot += delta;
    }

    fn clamp(&mut self) {
        self.stress = self.stress.clamp(STAT_MIN, STAT_MAX);
        self.fatigue = self.fatigue.clamp(STAT_MIN, STAT_MAX);
        self.connection = self.connection.clamp(STAT_MIN, STAT_MAX);
    }
}

/// Which shuffled pool to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Opening,
    Early,
    MidRandom,
    Late,
}

/// Per-run, shuffled, without-replacement event queues, one per mission
/// phase. Draws consume from the back of the shuffled stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PhasePools {
    pub opening: Vec<Event>,
    pub early: Vec<Event>,
    pub mid_random: Vec<Event>,
    pub late: Vec<Event>,
}

impl PhasePools {
    fn from_catalog(catalog: &EventCatalog, rng: &mut ChaCha20Rng) -> Self {
        let shuffle = |events: &[Event], rng: &mut ChaCha20Rng| {
            let mut pool = events.to_vec();
            pool.shuffle(rng);
            pool
        };
        Self {
            opening: shuffle(&catalog.opening, rng),
            early: shuffle(&catalog.early, rng),
            mid_random: shuffle(&catalog.mid_random, rng),
            late: shuffle(&catalog.late, rng),
        }
    }

    /// Draw the next event from a pool, or `None` when exhausted.
    pub fn take(&mut self, kind: PoolKind) -> Option<Event> {
        match kind {
            PoolKind::Opening => self.opening.pop(),
            PoolKind::Early => self.early.pop(),
            PoolKind::MidRandom => self.mid_random.pop(),
            PoolKind::Late => self.late.pop(),
        }
    }
}

/// Complete simulation state for one mission run.
///
/// Every bounded attribute is clamped into `[0, 100]` after every
/// mutation; no caller may observe a transient out-of-range value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionState {
    pub month: u32,
    pub total_months: u32,
    pub is_over: bool,
    pub cohesion: i32,
    pub morale: i32,
    pub conflict_risk: i32,
    pub support: i32,
    pub system_health: i32,
    pub used_opening: bool,
    pub used_mid_conditional: bool,
    pub pools: PhasePools,
    pub crew: Vec<CrewMember>,
    #[serde(skip)]
    pub(crate) rng: Option<ChaCha20Rng>,
}

impl MissionState {
    /// Fresh baseline state without pools or RNG. Mainly useful for tests
    /// and for callers that supply their own pools.
    #[must_use]
    pub fn baseline(total_months: u32) -> Self {
        Self {
            month: 1,
            total_months,
            is_over: false,
            cohesion: BASE_COHESION,
            morale: BASE_MORALE,
            conflict_risk: BASE_CONFLICT_RISK,
            support: BASE_SUPPORT,
            system_health: BASE_SYSTEM_HEALTH,
            used_opening: false,
            used_mid_conditional: false,
            pools: PhasePools::default(),
            crew: CREW_SEEDS
                .iter()
                .map(|(id, name, stress, fatigue, connection)| CrewMember {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    stress: *stress,
                    fatigue: *fatigue,
                    connection: *connection,
                })
                .collect(),
            rng: None,
        }
    }

    /// Build the state for a new run: baseline attributes, freshly
    /// shuffled pools, and a seeded RNG retained for monthly wear rolls.
    #[must_use]
    pub fn new_run(catalog: &EventCatalog, total_months: u32, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let pools = PhasePools::from_catalog(catalog, &mut rng);
        let mut state = Self::baseline(total_months);
        state.pools = pools;
        state.rng = Some(rng);
        state.clamp();
        state
    }

    /// Clamp every bounded scalar into `[0, 100]`. Idempotent.
    pub fn clamp(&mut self) {
        self.cohesion = self.cohesion.clamp(STAT_MIN, STAT_MAX);
        self.morale = self.morale.clamp(STAT_MIN, STAT_MAX);
        self.conflict_risk = self.conflict_risk.clamp(STAT_MIN, STAT_MAX);
        self.support = self.support.clamp(STAT_MIN, STAT_MAX);
        self.system_health = self.system_health.clamp(STAT_MIN, STAT_MAX);
        for member in &mut self.crew {
            member.clamp();
        }
    }

    #[must_use]
    pub fn mean_stress(&self) -> f64 {
        mean(self.crew.iter().map(|m| m.stress))
    }

    #[must_use]
    pub fn mean_fatigue(&self) -> f64 {
        mean(self.crew.iter().map(|m| m.fatigue))
    }

    /// Index of the most stressed member; ties break to crew order.
    #[must_use]
    pub fn max_stress_index(&self) -> usize {
        max_index(self.crew.iter().map(|m| m.stress))
    }

    /// Index of the most fatigued member; ties break to crew order.
    #[must_use]
    pub fn max_fatigue_index(&self) -> usize {
        max_index(self.crew.iter().map(|m| m.fatigue))
    }

    /// True when every bounded attribute sits inside `[0, 100]`.
    #[must_use]
    pub fn is_clamped(&self) -> bool {
        let in_range = |value: i32| (STAT_MIN..=STAT_MAX).contains(&value);
        in_range(self.cohesion)
            && in_range(self.morale)
            && in_range(self.conflict_risk)
            && in_range(self.support)
            && in_range(self.system_health)
            && self.crew.iter().all(|member| {
                in_range(member.stress) && in_range(member.fatigue) && in_range(member.connection)
            })
    }
}

fn mean(values: impl Iterator<Item = i32>) -> f64 {
    let mut sum = 0i64;
    let mut count = 0u32;
    for value in values {
        sum += i64::from(value);
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }
    sum as f64 / f64::from(count)
}

fn max_index(values: impl Iterator<Item = i32>) -> usize {
    let mut best_index = 0;
    let mut best = i32::MIN;
    for (index, value) in values.enumerate() {
        if value > best {
            best = value;
            best_index = index;
        }
    }
    best_index
}
