use serde::Serialize;

use crate::models::{CharacterSnapshot, FoodItem};
use crate::monte_carlo::{run_monte_carlo_with, AggregateStats, MonteCarloOptions};
use crate::skills::SkillTable;

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetrics {
    pub stats: AggregateStats,
    /// Mean damage over mean ticks survived.
    pub damage_per_hit: Option<f64>,
    /// `1 - stdDev / mean` of damage, in percent.
    pub consistency_pct: Option<f64>,
}

impl BuildMetrics {
    pub fn from_stats(stats: AggregateStats) -> Self {
        let damage = stats.damage_stats;
        Self {
            stats,
            damage_per_hit: ratio(damage.mean, stats.ticks_stats.mean),
            consistency_pct: ratio(damage.std_dev, damage.mean)
                .map(|spread| (1.0 - spread) * 100.0),
        }
    }
}

/// Build A is the baseline: deltas are B relative to A. `None` marks a
/// metric that is undefined for a degenerate build.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub iterations: usize,
    pub build_a: BuildMetrics,
    pub build_b: BuildMetrics,
    pub damage_delta_pct: Option<f64>,
    pub hits_delta_pct: Option<f64>,
}

pub fn compare_builds(
    iterations: usize,
    snapshot_a: &CharacterSnapshot,
    snapshot_b: &CharacterSnapshot,
    food: Option<&FoodItem>,
    skills: &SkillTable,
) -> ComparisonResult {
    let options = MonteCarloOptions {
        iterations,
        ..MonteCarloOptions::default()
    };
    compare_builds_with(snapshot_a, snapshot_b, food, skills, &options)
}

pub fn compare_builds_with(
    snapshot_a: &CharacterSnapshot,
    snapshot_b: &CharacterSnapshot,
    food: Option<&FoodItem>,
    skills: &SkillTable,
    options: &MonteCarloOptions,
) -> ComparisonResult {
    let stats_a = run_monte_carlo_with(snapshot_a, food, skills, options);
    let stats_b = run_monte_carlo_with(snapshot_b, food, skills, options);
    compare_stats(stats_a, stats_b)
}

pub fn compare_stats(stats_a: AggregateStats, stats_b: AggregateStats) -> ComparisonResult {
    ComparisonResult {
        iterations: stats_a.iterations,
        damage_delta_pct: delta_pct(stats_a.damage_stats.mean, stats_b.damage_stats.mean),
        hits_delta_pct: delta_pct(stats_a.ticks_stats.mean, stats_b.ticks_stats.mean),
        build_a: BuildMetrics::from_stats(stats_a),
        build_b: BuildMetrics::from_stats(stats_b),
    }
}

fn delta_pct(baseline: f64, other: f64) -> Option<f64> {
    ratio(other - baseline, baseline).map(|change| change * 100.0)
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}
