use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::engine::run_survival_loop;
use crate::models::{CharacterSnapshot, FoodItem, DEFAULT_TICK_CEILING};
use crate::skills::SkillTable;
use crate::state::{EndReason, SimulationOutcome};
use crate::stats::SimulationContext;

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl SampleStats {
    /// Mean, extremes and population standard deviation; all zero for an
    /// empty sample.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = samples
            .iter()
            .map(|value| (value - mean) * (value - mean))
            .sum::<f64>()
            / count as f64;

        Self {
            count,
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        }
    }
}

/// Share of runs, in percent of the iteration count, ending for each reason.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndReasonStats {
    pub by_health: f64,
    pub by_weapon: f64,
    pub by_max_ticks: f64,
}

impl EndReasonStats {
    pub fn from_outcomes(outcomes: &[SimulationOutcome]) -> Self {
        if outcomes.is_empty() {
            return Self::default();
        }
        let total = outcomes.len() as f64;
        let share = |reason: EndReason| {
            let count = outcomes
                .iter()
                .filter(|outcome| outcome.end_reason == reason)
                .count();
            count as f64 / total * 100.0
        };
        Self {
            by_health: share(EndReason::NoHealth),
            by_weapon: share(EndReason::WeaponBroken),
            by_max_ticks: share(EndReason::MaxTicks),
        }
    }

    pub fn share(&self, reason: EndReason) -> f64 {
        match reason {
            EndReason::NoHealth => self.by_health,
            EndReason::WeaponBroken => self.by_weapon,
            EndReason::MaxTicks => self.by_max_ticks,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub iterations: usize,
    pub damage_stats: SampleStats,
    pub ticks_stats: SampleStats,
    pub end_reason_stats: EndReasonStats,
    pub noise_factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonteCarloOptions {
    pub iterations: usize,
    pub tick_ceiling: u32,
    pub seed: Option<u64>,
    pub random_factor: bool,
}

impl Default for MonteCarloOptions {
    fn default() -> Self {
        Self {
            iterations: crate::models::DEFAULT_ITERATIONS,
            tick_ceiling: DEFAULT_TICK_CEILING,
            seed: None,
            random_factor: false,
        }
    }
}

pub fn run_monte_carlo(
    iterations: usize,
    snapshot: &CharacterSnapshot,
    food: Option<&FoodItem>,
    skills: &SkillTable,
) -> AggregateStats {
    let options = MonteCarloOptions {
        iterations,
        ..MonteCarloOptions::default()
    };
    run_monte_carlo_with(snapshot, food, skills, &options)
}

/// Runs `options.iterations` independent survival loops in parallel.
///
/// The noise factor, when enabled, is drawn once for the whole batch, so
/// run-to-run variance comes only from combat rolls. Run `i` is seeded
/// from the batch seed plus `i + 1`, which keeps seeded batches
/// reproducible regardless of scheduling.
pub fn run_monte_carlo_with(
    snapshot: &CharacterSnapshot,
    food: Option<&FoodItem>,
    skills: &SkillTable,
    options: &MonteCarloOptions,
) -> AggregateStats {
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut batch_rng = StdRng::seed_from_u64(seed);
    let ctx = if options.random_factor {
        SimulationContext::with_random_factor(skills, &mut batch_rng)
    } else {
        SimulationContext::new(skills)
    };

    let outcomes: Vec<SimulationOutcome> = (0..options.iterations)
        .into_par_iter()
        .map(|idx| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64 + 1));
            run_survival_loop(snapshot, &ctx, food, options.tick_ceiling, &mut rng)
        })
        .collect();

    aggregate(&outcomes, ctx.noise_factor())
}

pub fn aggregate(outcomes: &[SimulationOutcome], noise_factor: f64) -> AggregateStats {
    let damage: Vec<f64> = outcomes
        .iter()
        .map(|outcome| outcome.total_damage_dealt)
        .collect();
    let ticks: Vec<f64> = outcomes
        .iter()
        .map(|outcome| outcome.ticks_survived as f64)
        .collect();

    AggregateStats {
        iterations: outcomes.len(),
        damage_stats: SampleStats::from_samples(&damage),
        ticks_stats: SampleStats::from_samples(&ticks),
        end_reason_stats: EndReasonStats::from_outcomes(outcomes),
        noise_factor,
    }
}
