//! Drives complete missions through the engine and records outcomes.

use anyhow::{Context, Result, bail};
use log::debug;
use marsbound_game::{
    Difficulty, MissionEngine, MissionOutcome, TurnPhase, encode_friendly,
};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::policy::ChoicePolicy;

/// Record of one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub code: String,
    pub seed: u64,
    pub months_survived: u32,
    pub won: bool,
    /// Stable loss key, e.g. `crew-stress`; absent on victory.
    pub loss_kind: Option<&'static str>,
    pub outcome_text: String,
}

/// Play one mission to its terminal state under the given policy.
///
/// The policy RNG is separate from the engine's seeded RNG so that a
/// `first`-policy replay of the same seed is bit-for-bit identical.
pub fn run_mission(
    difficulty: Difficulty,
    seed: u64,
    policy: ChoicePolicy,
    policy_rng: &mut ChaCha20Rng,
) -> Result<RunSummary> {
    let mut engine = MissionEngine::with_default_catalog(difficulty, seed)
        .context("embedded event catalog failed validation")?;

    // Each month needs at most one choice and one advance.
    let max_steps = engine.snapshot().total_months * 2 + 4;
    let mut steps = 0;
    loop {
        match engine.phase() {
            TurnPhase::AwaitingChoice => {
                let event = engine
                    .current_event()
                    .context("awaiting choice without an event")?;
                let pick = policy.pick(event, engine.snapshot(), policy_rng);
                debug!("month {}: {} -> choice {pick}", engine.snapshot().month, event.id);
                engine
                    .choose_option(pick)
                    .context("policy picked an invalid choice index")?;
            }
            TurnPhase::Resolved => engine.advance_month(),
            TurnPhase::GameOver => break,
        }
        steps += 1;
        if steps > max_steps {
            bail!("run exceeded {max_steps} steps without terminating");
        }
    }

    let outcome = engine
        .outcome()
        .context("terminal engine without an outcome")?;
    let (won, loss_kind) = match outcome {
        MissionOutcome::Victory => (true, None),
        MissionOutcome::Defeat(reason) => (false, Some(reason.kind())),
    };
    Ok(RunSummary {
        code: encode_friendly(difficulty, seed),
        seed,
        months_survived: engine.snapshot().month,
        won,
        loss_kind,
        outcome_text: outcome.to_string(),
    })
}
