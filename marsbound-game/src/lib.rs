//! Marsbound Mission Engine
//!
//! Platform-agnostic core simulation for Marsbound, an interactive
//! narrative about a four-person crew on a multi-month transit to Mars.
//! This crate owns the mission state, the phase-based event selection
//! policy, effect application, and win/lose evaluation; rendering and
//! input wiring belong to the embedding layer.

pub mod constants;
pub mod data;
pub mod difficulty;
pub mod effects;
pub mod engine;
pub mod report;
pub mod seed;
pub mod selector;
pub mod state;

// Re-export commonly used types
pub use data::{
    CatalogError, Choice, ChoiceList, ConditionalEvents, DangerEvents, Event, EventCatalog,
    FinaleEvents,
};
pub use difficulty::{Difficulty, DifficultyConfig};
pub use effects::{CrewField, CrewTarget, EffectOp, Effects, Metric};
pub use engine::{ChoiceOutcome, LossReason, MissionEngine, MissionOutcome, TurnPhase};
pub use report::{CrewDelta, CrewSnapshot, DeltaReport, MetricDelta, Snapshot};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy};
pub use selector::{PhaseSchedule, select_event};
pub use state::{CrewMember, MissionState, PhasePools, PoolKind};
