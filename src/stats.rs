use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::models::{CharacterSnapshot, ItemStat, SkillCode, Slot};
use crate::skills::SkillTable;

pub const NOISE_MIN: f64 = 0.9;
pub const NOISE_MAX: f64 = 1.1;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Attack,
    Precision,
    CriticalChance,
    CriticalDamages,
    Armor,
    Dodge,
    LootChance,
}

impl StatKind {
    pub const ALL: [StatKind; 7] = [
        StatKind::Attack,
        StatKind::Precision,
        StatKind::CriticalChance,
        StatKind::CriticalDamages,
        StatKind::Armor,
        StatKind::Dodge,
        StatKind::LootChance,
    ];

    pub fn skill(self) -> SkillCode {
        match self {
            StatKind::Attack => SkillCode::Attack,
            StatKind::Precision => SkillCode::Precision,
            StatKind::CriticalChance => SkillCode::CriticalChance,
            StatKind::CriticalDamages => SkillCode::CriticalDamages,
            StatKind::Armor => SkillCode::Armor,
            StatKind::Dodge => SkillCode::Dodge,
            StatKind::LootChance => SkillCode::LootChance,
        }
    }

    /// Equipment slots feeding this stat and the item bonus read from each.
    pub fn equipment_sources(self) -> &'static [(Slot, ItemStat)] {
        match self {
            StatKind::Attack => &[(Slot::Weapon, ItemStat::Attack)],
            StatKind::Precision => &[(Slot::Gloves, ItemStat::Precision)],
            StatKind::CriticalChance => &[(Slot::Weapon, ItemStat::CriticalChance)],
            StatKind::CriticalDamages => &[(Slot::Helmet, ItemStat::CriticalDamages)],
            StatKind::Armor => &[(Slot::Chest, ItemStat::Armor), (Slot::Pants, ItemStat::Armor)],
            StatKind::Dodge => &[(Slot::Boots, ItemStat::Dodge)],
            StatKind::LootChance => &[],
        }
    }

    fn uses_attack_buffs(self) -> bool {
        matches!(self, StatKind::Attack)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.skill().code())
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatTotal<'a> {
    pub skill_value: f64,
    pub equipment_value: f64,
    pub equipment_items: Vec<&'a str>,
    pub ammo_percent: f64,
    pub buff_percent: f64,
    pub total: f64,
}

/// Per-run resolver inputs: the shared skill table and the skill-value
/// noise factor.
///
/// The noise factor stays fixed until `reset_noise` is called, so every
/// stat and every tick of one outcome sees the same value.
#[derive(Clone, Copy, Debug)]
pub struct SimulationContext<'a> {
    pub skills: &'a SkillTable,
    random_factor: bool,
    noise_factor: f64,
}

impl<'a> SimulationContext<'a> {
    pub fn new(skills: &'a SkillTable) -> Self {
        Self {
            skills,
            random_factor: false,
            noise_factor: 1.0,
        }
    }

    pub fn with_random_factor<R: Rng + ?Sized>(skills: &'a SkillTable, rng: &mut R) -> Self {
        let mut ctx = Self {
            skills,
            random_factor: true,
            noise_factor: 1.0,
        };
        ctx.reset_noise(rng);
        ctx
    }

    pub fn random_factor(&self) -> bool {
        self.random_factor
    }

    pub fn noise_factor(&self) -> f64 {
        self.noise_factor
    }

    /// Redraws the noise factor; a no-op when the random factor is disabled.
    pub fn reset_noise<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.random_factor {
            self.noise_factor = rng.gen_range(NOISE_MIN..=NOISE_MAX);
        }
    }
}

/// Numeric parts of one stat, without the item labels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct StatParts {
    skill_value: f64,
    equipment_value: f64,
    ammo_percent: f64,
    buff_percent: f64,
}

impl StatParts {
    fn resolve(
        snapshot: &CharacterSnapshot,
        ctx: &SimulationContext<'_>,
        stat: StatKind,
    ) -> Self {
        let level = snapshot.skill_level(stat.skill());
        let skill_value = ctx.skills.value(stat.skill(), level) * ctx.noise_factor;
        let equipment_value = stat
            .equipment_sources()
            .iter()
            .fold(0.0, |acc, (slot, item_stat)| {
                acc + snapshot.equipped_items.bonus(*slot, *item_stat)
            });

        let (ammo_percent, buff_percent) = if stat.uses_attack_buffs() {
            let buffs = &snapshot.active_buffs;
            (
                buffs
                    .ammo
                    .as_ref()
                    .map_or(0.0, |item| item.stat(ItemStat::PercentAttack)),
                buffs
                    .consumable
                    .as_ref()
                    .map_or(0.0, |item| item.stat(ItemStat::PercentAttack)),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            skill_value,
            equipment_value,
            ammo_percent,
            buff_percent,
        }
    }

    fn total(&self) -> f64 {
        let base = self.skill_value + self.equipment_value;
        round_to(
            base * (1.0 + self.ammo_percent / 100.0 + self.buff_percent / 100.0),
            1,
        )
    }
}

/// Total of one stat. Same value as `resolve_stat(..).total`, without
/// building the source breakdown.
pub fn stat_value(
    snapshot: &CharacterSnapshot,
    ctx: &SimulationContext<'_>,
    stat: StatKind,
) -> f64 {
    StatParts::resolve(snapshot, ctx, stat).total()
}

pub fn resolve_stat<'a>(
    snapshot: &'a CharacterSnapshot,
    ctx: &SimulationContext<'_>,
    stat: StatKind,
) -> StatTotal<'a> {
    let parts = StatParts::resolve(snapshot, ctx, stat);
    let equipment_items = stat
        .equipment_sources()
        .iter()
        .filter_map(|(slot, _)| snapshot.equipped_items.get(*slot))
        .map(|item| item.label())
        .collect();

    StatTotal {
        skill_value: parts.skill_value,
        equipment_value: parts.equipment_value,
        equipment_items,
        ammo_percent: parts.ammo_percent,
        buff_percent: parts.buff_percent,
        total: parts.total(),
    }
}

pub fn resolve_all<'a>(
    snapshot: &'a CharacterSnapshot,
    ctx: &SimulationContext<'_>,
) -> Vec<(StatKind, StatTotal<'a>)> {
    StatKind::ALL
        .into_iter()
        .map(|stat| (stat, resolve_stat(snapshot, ctx, stat)))
        .collect()
}

/// Starting and maximum health, taken from the health skill.
pub fn max_health(snapshot: &CharacterSnapshot, ctx: &SimulationContext<'_>) -> f64 {
    let level = snapshot.skill_level(SkillCode::Health);
    ctx.skills.value(SkillCode::Health, level)
}

pub fn max_hunger(snapshot: &CharacterSnapshot, ctx: &SimulationContext<'_>) -> f64 {
    let level = snapshot.skill_level(SkillCode::Hunger);
    ctx.skills.value(SkillCode::Hunger, level)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
