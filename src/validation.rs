use serde::Serialize;
use std::fmt;

use crate::models::{CharacterSnapshot, SkillCode};
use crate::skills::SkillTable;
use crate::stats::{max_health, max_hunger, resolve_all, SimulationContext, StatKind, StatTotal};

pub const SKILL_POINTS_PER_LEVEL: u32 = 4;

/// A reason a build could not be reached in game. The engine still
/// simulates such builds; these are reported, never enforced.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildIssue {
    UnknownLevel {
        skill: SkillCode,
        level: u8,
    },
    Locked {
        skill: SkillCode,
        level: u8,
        unlock_at_level: u32,
        player_level: u32,
    },
    OverBudget {
        spent: u32,
        budget: u32,
    },
}

impl fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildIssue::UnknownLevel { skill, level } => {
                write!(f, "{} level {} is not in the skill table", skill, level)
            }
            BuildIssue::Locked {
                skill,
                level,
                unlock_at_level,
                player_level,
            } => write!(
                f,
                "{} level {} unlocks at player level {} (player is {})",
                skill, level, unlock_at_level, player_level
            ),
            BuildIssue::OverBudget { spent, budget } => {
                write!(f, "{} skill points spent, budget is {}", spent, budget)
            }
        }
    }
}

pub fn skill_point_budget(player_level: u32) -> u32 {
    player_level.saturating_mul(SKILL_POINTS_PER_LEVEL)
}

/// Cumulative cost of every learned skill; unknown levels cost nothing.
pub fn skill_points_spent(snapshot: &CharacterSnapshot, table: &SkillTable) -> u32 {
    SkillCode::ALL
        .into_iter()
        .filter_map(|code| table.level(code, snapshot.skill_level(code)))
        .map(|data| data.cost)
        .sum()
}

pub fn validate_snapshot(snapshot: &CharacterSnapshot, table: &SkillTable) -> Vec<BuildIssue> {
    let mut issues = Vec::new();

    for code in SkillCode::ALL {
        let level = snapshot.skill_level(code);
        match table.level(code, level) {
            None => issues.push(BuildIssue::UnknownLevel { skill: code, level }),
            Some(data) if data.unlock_at_level > snapshot.player_level => {
                issues.push(BuildIssue::Locked {
                    skill: code,
                    level,
                    unlock_at_level: data.unlock_at_level,
                    player_level: snapshot.player_level,
                })
            }
            Some(_) => {}
        }
    }

    let spent = skill_points_spent(snapshot, table);
    let budget = skill_point_budget(snapshot.player_level);
    if spent > budget {
        issues.push(BuildIssue::OverBudget { spent, budget });
    }

    issues
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStat<'a> {
    pub stat: StatKind,
    #[serde(flatten)]
    pub total: StatTotal<'a>,
}

/// Everything `show-build` prints about a snapshot.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport<'a> {
    pub player_level: u32,
    pub stats: Vec<ResolvedStat<'a>>,
    pub max_health: f64,
    pub max_hunger: f64,
    pub skill_points_spent: u32,
    pub skill_point_budget: u32,
    pub issues: Vec<BuildIssue>,
}

pub fn build_report<'a>(
    snapshot: &'a CharacterSnapshot,
    ctx: &SimulationContext<'_>,
) -> BuildReport<'a> {
    BuildReport {
        player_level: snapshot.player_level,
        stats: resolve_all(snapshot, ctx)
            .into_iter()
            .map(|(stat, total)| ResolvedStat { stat, total })
            .collect(),
        max_health: max_health(snapshot, ctx),
        max_hunger: max_hunger(snapshot, ctx),
        skill_points_spent: skill_points_spent(snapshot, ctx.skills),
        skill_point_budget: skill_point_budget(snapshot.player_level),
        issues: validate_snapshot(snapshot, ctx.skills),
    }
}
