//! Before/after snapshots and human-readable delta reporting.

use serde::{Deserialize, Serialize};

use crate::state::MissionState;

/// Point-in-time copy of every presentable attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cohesion: i32,
    pub morale: i32,
    pub conflict_risk: i32,
    pub support: i32,
    pub system_health: i32,
    pub crew: Vec<CrewSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewSnapshot {
    pub name: String,
    pub stress: i32,
    pub fatigue: i32,
    pub connection: i32,
}

impl Snapshot {
    #[must_use]
    pub fn of(state: &MissionState) -> Self {
        Self {
            cohesion: state.cohesion,
            morale: state.morale,
            conflict_risk: state.conflict_risk,
            support: state.support,
            system_health: state.system_health,
            crew: state
                .crew
                .iter()
                .map(|member| CrewSnapshot {
                    name: member.name.clone(),
                    stress: member.stress,
                    fatigue: member.fatigue,
                    connection: member.connection,
                })
                .collect(),
        }
    }
}

/// One changed scalar, labeled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub label: String,
    pub delta: i32,
}

/// Changed crew scalars for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewDelta {
    pub name: String,
    pub fields: Vec<MetricDelta>,
}

/// Every nonzero attribute change between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeltaReport {
    pub metrics: Vec<MetricDelta>,
    pub crew: Vec<CrewDelta>,
}

fn changed(label: &str, before: i32, after: i32) -> Option<MetricDelta> {
    let delta = after - before;
    (delta != 0).then(|| MetricDelta {
        label: label.to_string(),
        delta,
    })
}

impl DeltaReport {
    #[must_use]
    pub fn between(before: &Snapshot, after: &Snapshot) -> Self {
        let metrics = [
            changed("Cohesion", before.cohesion, after.cohesion),
            changed("Morale", before.morale, after.morale),
            changed("Conflict Risk", before.conflict_risk, after.conflict_risk),
            changed("NASA Support", before.support, after.support),
            changed("VR System", before.system_health, after.system_health),
        ]
        .into_iter()
        .flatten()
        .collect();

        let crew = after
            .crew
            .iter()
            .zip(&before.crew)
            .filter_map(|(now, prev)| {
                let fields: Vec<MetricDelta> = [
                    changed("Stress", prev.stress, now.stress),
                    changed("Fatigue", prev.fatigue, now.fatigue),
                    changed("Connection", prev.connection, now.connection),
                ]
                .into_iter()
                .flatten()
                .collect();
                (!fields.is_empty()).then(|| CrewDelta {
                    name: now.name.clone(),
                    fields,
                })
            })
            .collect();

        Self { metrics, crew }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.crew.is_empty()
    }

    /// Render the report as a single display line.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "No stat changes.".to_string();
        }

        let mut sections = Vec::new();
        if !self.metrics.is_empty() {
            sections.push(
                self.metrics
                    .iter()
                    .map(format_delta)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        if !self.crew.is_empty() {
            sections.push(
                self.crew
                    .iter()
                    .map(|member| {
                        let fields = member
                            .fields
                            .iter()
                            .map(format_delta)
                            .collect::<Vec<_>>()
                            .join(", ");
                        format!("{}: {fields}", member.name)
                    })
                    .collect::<Vec<_>>()
                    .join(" | "),
            );
        }
        format!("Changes: {}", sections.join(" \u{b7} "))
    }
}

fn format_delta(entry: &MetricDelta) -> String {
    let sign = if entry.delta > 0 { "+" } else { "" };
    format!("{} {sign}{}", entry.label, entry.delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MissionState;

    #[test]
    fn identical_snapshots_report_no_changes() {
        let state = MissionState::baseline(17);
        let snap = Snapshot::of(&state);
        let report = DeltaReport::between(&snap, &snap);
        assert!(report.is_empty());
        assert_eq!(report.describe(), "No stat changes.");
    }

    #[test]
    fn only_nonzero_deltas_are_listed() {
        let mut state = MissionState::baseline(17);
        let before = Snapshot::of(&state);
        state.cohesion += 2;
        state.crew[0].stress -= 5;
        let report = DeltaReport::between(&before, &Snapshot::of(&state));

        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.metrics[0].label, "Cohesion");
        assert_eq!(report.metrics[0].delta, 2);
        assert_eq!(report.crew.len(), 1);
        assert_eq!(report.crew[0].fields[0].delta, -5);
    }

    #[test]
    fn describe_formats_signs_and_sections() {
        let mut state = MissionState::baseline(17);
        let before = Snapshot::of(&state);
        state.morale -= 3;
        state.crew[1].fatigue += 2;
        let line = DeltaReport::between(&before, &Snapshot::of(&state)).describe();
        assert!(line.starts_with("Changes: Morale -3"));
        assert!(line.contains("Astronaut B (Scientist): Fatigue +2"));
    }
}
