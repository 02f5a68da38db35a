//! Centralized balance and tuning constants for Marsbound simulation logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Attribute bounds ---------------------------------------------------------
pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;

// Baseline mission metrics -------------------------------------------------
pub const BASE_COHESION: i32 = 70;
pub const BASE_MORALE: i32 = 70;
pub const BASE_CONFLICT_RISK: i32 = 20;
pub const BASE_SUPPORT: i32 = 100;
pub const BASE_SYSTEM_HEALTH: i32 = 80;

// Monthly wear and tear ----------------------------------------------------
pub const WEAR_ROLL_MIN: i32 = 2;
pub const WEAR_ROLL_MAX: i32 = 3;
pub const MORALE_MONTHLY_DECAY: f32 = 1.0;
pub const CONFLICT_MONTHLY_CREEP: f32 = 2.0;

// Mid-mission conditional branch thresholds --------------------------------
pub const MID_STRESS_HIGH: f64 = 70.0;
pub const MID_COHESION_LOW: i32 = 40;
pub const MID_MORALE_LOW: i32 = 40;
pub const MID_FATIGUE_HIGH: f64 = 60.0;

// Finale tier thresholds ---------------------------------------------------
pub const FINALE_HIGH_CORE: f64 = 75.0;
pub const FINALE_HIGH_STRESS: f64 = 40.0;
pub const FINALE_HIGH_FATIGUE: f64 = 50.0;
pub const FINALE_HIGH_CONFLICT: i32 = 30;
pub const FINALE_MODERATE_CORE: f64 = 55.0;
pub const FINALE_MODERATE_STRESS: f64 = 60.0;
pub const FINALE_LOW_CORE: f64 = 35.0;

// Fallback result line when a choice carries no outcome text ---------------
pub(crate) const DEFAULT_RESULT_TEXT: &str = "Decision logged.";
