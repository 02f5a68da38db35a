//! Aggregation and console/JSON reporting for batches of runs.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::simulation::RunSummary;

/// Batch statistics across a set of completed runs.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub runs: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub mean_months: f64,
    /// Defeats grouped by stable loss key, most frequent first by key order.
    pub losses_by_kind: BTreeMap<&'static str, usize>,
}

impl BatchReport {
    #[must_use]
    pub fn from_runs(runs: &[RunSummary]) -> Self {
        let wins = runs.iter().filter(|r| r.won).count();
        let mut losses_by_kind = BTreeMap::new();
        for run in runs {
            if let Some(kind) = run.loss_kind {
                *losses_by_kind.entry(kind).or_insert(0) += 1;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let (win_rate, mean_months) = if runs.is_empty() {
            (0.0, 0.0)
        } else {
            (
                wins as f64 / runs.len() as f64,
                runs.iter().map(|r| f64::from(r.months_survived)).sum::<f64>() / runs.len() as f64,
            )
        };
        Self {
            runs: runs.len(),
            wins,
            win_rate,
            mean_months,
            losses_by_kind,
        }
    }
}

pub fn print_run_line(run: &RunSummary) {
    let status = if run.won {
        "ARRIVED".green().bold()
    } else {
        "LOST".red().bold()
    };
    println!(
        "{status} [{}] month {:>2} - {}",
        run.code.cyan(),
        run.months_survived,
        run.outcome_text
    );
}

pub fn write_console_report(out: &mut dyn Write, report: &BatchReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Mission Batch Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    writeln!(out, "Runs: {}", report.runs)?;
    writeln!(
        out,
        "Arrivals: {} ({:.1}%)",
        report.wins.to_string().green(),
        report.win_rate * 100.0
    )?;
    writeln!(out, "Mean months survived: {:.1}", report.mean_months)?;
    if !report.losses_by_kind.is_empty() {
        writeln!(out, "Losses by cause:")?;
        for (kind, count) in &report.losses_by_kind {
            writeln!(out, "  {:<20} {}", kind, count.to_string().red())?;
        }
    }
    Ok(())
}

pub fn write_json_report(
    out: &mut dyn Write,
    runs: &[RunSummary],
    report: &BatchReport,
) -> Result<()> {
    #[derive(Serialize)]
    struct Payload<'a> {
        summary: &'a BatchReport,
        runs: &'a [RunSummary],
    }
    let payload = Payload { summary: report, runs };
    writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(won: bool, months: u32, loss_kind: Option<&'static str>) -> RunSummary {
        RunSummary {
            code: "NM-PHOBOS42".to_string(),
            seed: 42,
            months_survived: months,
            won,
            loss_kind,
            outcome_text: "text".to_string(),
        }
    }

    #[test]
    fn aggregates_wins_and_loss_kinds() {
        let runs = vec![
            sample(true, 18, None),
            sample(false, 9, Some("crew-stress")),
            sample(false, 5, Some("crew-stress")),
            sample(false, 12, Some("morale-depleted")),
        ];
        let report = BatchReport::from_runs(&runs);
        assert_eq!(report.runs, 4);
        assert_eq!(report.wins, 1);
        assert_eq!(report.losses_by_kind["crew-stress"], 2);
        assert_eq!(report.losses_by_kind["morale-depleted"], 1);
        assert!((report.win_rate - 0.25).abs() < f64::EPSILON);
        assert!((report.mean_months - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_batch_reports_zeroes() {
        let report = BatchReport::from_runs(&[]);
        assert_eq!(report.runs, 0);
        assert!(report.losses_by_kind.is_empty());
        assert!(report.win_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn console_report_renders_causes() {
        let runs = vec![sample(false, 9, Some("conflict-spike"))];
        let report = BatchReport::from_runs(&runs);
        let mut buf = Vec::new();
        write_console_report(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("conflict-spike"));
        assert!(text.contains("Runs: 1"));
    }

    #[test]
    fn json_report_is_valid_json() {
        let runs = vec![sample(true, 18, None)];
        let report = BatchReport::from_runs(&runs);
        let mut buf = Vec::new();
        write_json_report(&mut buf, &runs, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["summary"]["wins"], 1);
        assert_eq!(value["runs"][0]["code"], "NM-PHOBOS42");
    }
}
