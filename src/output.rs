use serde::Serialize;
use std::fmt::Write;

use crate::compare::{BuildMetrics, ComparisonResult};
use crate::models::SkillCode;
use crate::monte_carlo::{AggregateStats, SampleStats};
use crate::skills::SkillTable;
use crate::state::{DetailedRun, EndReason};
use crate::validation::BuildReport;

pub trait Formatter {
    fn single_run(&self, run: &DetailedRun) -> String;
    fn monte_carlo(&self, stats: &AggregateStats) -> String;
    fn comparison(&self, result: &ComparisonResult) -> String;
    fn build(&self, report: &BuildReport) -> String;
    fn skills(&self, table: &SkillTable) -> String;
}

/// Full output: run logs, every statistic, every stat component.
pub struct HumanFormatter;

/// Headline numbers only.
pub struct SummaryFormatter;

pub struct JsonFormatter;

impl Formatter for HumanFormatter {
    fn single_run(&self, run: &DetailedRun) -> String {
        let mut output = String::new();
        output.push_str("Log:\n");
        for entry in &run.log {
            let _ = writeln!(output, "{}", entry);
        }
        output.push_str(&SummaryFormatter.single_run(run));
        output
    }

    fn monte_carlo(&self, stats: &AggregateStats) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Monte Carlo ({} runs):", stats.iterations);
        let _ = writeln!(output, "damage: {}", sample_line(&stats.damage_stats));
        let _ = writeln!(output, "ticks: {}", sample_line(&stats.ticks_stats));
        let _ = writeln!(output, "end reasons: {}", end_reason_line(stats));
        let _ = writeln!(output, "noise factor: {:.3}", stats.noise_factor);
        output
    }

    fn comparison(&self, result: &ComparisonResult) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Comparison ({} runs each):", result.iterations);
        for (label, metrics) in [("Build A", &result.build_a), ("Build B", &result.build_b)] {
            let _ = writeln!(output, "{}:", label);
            let _ = writeln!(output, "  damage: {}", sample_line(&metrics.stats.damage_stats));
            let _ = writeln!(output, "  ticks: {}", sample_line(&metrics.stats.ticks_stats));
            let _ = writeln!(output, "  end reasons: {}", end_reason_line(&metrics.stats));
            let _ = writeln!(output, "  {}", metrics_line(metrics));
        }
        output.push_str(&delta_lines(result));
        output
    }

    fn build(&self, report: &BuildReport) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Player level: {}", report.player_level);
        output.push_str("Stats:\n");
        for resolved in &report.stats {
            let total = &resolved.total;
            let _ = write!(
                output,
                "{}: {:.1} (skill {:.1}, equipment {:.1}",
                resolved.stat, total.total, total.skill_value, total.equipment_value
            );
            if !total.equipment_items.is_empty() {
                let _ = write!(output, " from {}", total.equipment_items.join(", "));
            }
            if total.ammo_percent != 0.0 {
                let _ = write!(output, ", ammo {:+.1}%", total.ammo_percent);
            }
            if total.buff_percent != 0.0 {
                let _ = write!(output, ", buff {:+.1}%", total.buff_percent);
            }
            output.push_str(")\n");
        }
        output.push_str(&SummaryFormatter.build(report));
        output
    }

    fn skills(&self, table: &SkillTable) -> String {
        let mut output = String::new();
        for code in SkillCode::ALL {
            let _ = writeln!(output, "{}:", code);
            for (level, data) in table.levels(code) {
                let _ = writeln!(
                    output,
                    "  {}: value {}, cost {}, unlocks at {}",
                    level, data.value, data.cost, data.unlock_at_level
                );
            }
        }
        output
    }
}

impl Formatter for SummaryFormatter {
    fn single_run(&self, run: &DetailedRun) -> String {
        let mut output = String::new();
        output.push_str("Summary:\n");
        let _ = writeln!(output, "damage: {:.1}", run.outcome.total_damage_dealt);
        let _ = writeln!(output, "ticks: {}", run.outcome.ticks_survived);
        let _ = writeln!(output, "end reason: {}", run.outcome.end_reason);
        let _ = writeln!(output, "health left: {:.1}", run.final_health);
        let _ = writeln!(output, "hunger left: {}", run.hunger_left);
        for entry in &run.durability {
            let _ = writeln!(output, "{} durability: {}", entry.slot, entry.remaining);
        }
        output
    }

    fn monte_carlo(&self, stats: &AggregateStats) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "runs: {}", stats.iterations);
        let _ = writeln!(output, "avg damage: {:.1}", stats.damage_stats.mean);
        let _ = writeln!(output, "avg ticks: {:.1}", stats.ticks_stats.mean);
        output
    }

    fn comparison(&self, result: &ComparisonResult) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Build A: {}", metrics_line(&result.build_a));
        let _ = writeln!(output, "Build B: {}", metrics_line(&result.build_b));
        output.push_str(&delta_lines(result));
        output
    }

    fn build(&self, report: &BuildReport) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "health: {:.1}", report.max_health);
        let _ = writeln!(output, "hunger: {}", report.max_hunger);
        let _ = writeln!(
            output,
            "skill points: {}/{}",
            report.skill_points_spent, report.skill_point_budget
        );
        if !report.issues.is_empty() {
            output.push_str("Issues:\n");
            for issue in &report.issues {
                let _ = writeln!(output, "- {}", issue);
            }
        }
        output
    }

    fn skills(&self, _table: &SkillTable) -> String {
        SkillCode::ALL
            .iter()
            .map(|code| format!("{}\n", code))
            .collect()
    }
}

impl Formatter for JsonFormatter {
    fn single_run(&self, run: &DetailedRun) -> String {
        to_json(run)
    }

    fn monte_carlo(&self, stats: &AggregateStats) -> String {
        to_json(stats)
    }

    fn comparison(&self, result: &ComparisonResult) -> String {
        to_json(result)
    }

    fn build(&self, report: &BuildReport) -> String {
        to_json(report)
    }

    fn skills(&self, table: &SkillTable) -> String {
        to_json(table)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => format!("{}\n", json),
        Err(err) => format!("{{\"error\": \"{}\"}}\n", err),
    }
}

fn sample_line(stats: &SampleStats) -> String {
    format!(
        "mean {:.1}, min {:.1}, max {:.1}, std dev {:.1}",
        stats.mean, stats.min, stats.max, stats.std_dev
    )
}

fn end_reason_line(stats: &AggregateStats) -> String {
    EndReason::ALL
        .iter()
        .map(|reason| format!("{} {:.1}%", reason, stats.end_reason_stats.share(*reason)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn metrics_line(metrics: &BuildMetrics) -> String {
    format!(
        "avg damage {:.1}, avg ticks {:.1}, damage/hit {}, consistency {}",
        metrics.stats.damage_stats.mean,
        metrics.stats.ticks_stats.mean,
        or_na(metrics.damage_per_hit, ""),
        or_na(metrics.consistency_pct, "%"),
    )
}

fn delta_lines(result: &ComparisonResult) -> String {
    format!(
        "damage delta: {}\nhits delta: {}\n",
        signed_or_na(result.damage_delta_pct),
        signed_or_na(result.hits_delta_pct)
    )
}

fn or_na(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(value) => format!("{:.1}{}", value, suffix),
        None => "N/A".to_string(),
    }
}

fn signed_or_na(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:+.1}%", value),
        None => "N/A".to_string(),
    }
}
