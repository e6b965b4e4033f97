use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const MAX_SKILL_LEVEL: u8 = 10;
pub const DEFAULT_ITERATIONS: usize = 1000;
pub const DEFAULT_TICK_CEILING: u32 = 2000;
pub const MAX_TICK_CEILING: u32 = 5000;
pub const DEFAULT_DURABILITY: u32 = 100;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    #[serde(default)]
    pub character: CharacterSnapshot,
    #[serde(default)]
    pub food: Option<FoodItem>,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub random_factor: bool,
    #[serde(default)]
    pub skill_table: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            character: CharacterSnapshot::default(),
            food: None,
            iterations: DEFAULT_ITERATIONS,
            max_ticks: DEFAULT_TICK_CEILING,
            seed: None,
            random_factor: false,
            skill_table: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum SkillCode {
    Attack,
    Precision,
    CriticalChance,
    CriticalDamages,
    Armor,
    Dodge,
    Health,
    LootChance,
    Hunger,
}

impl SkillCode {
    pub const ALL: [SkillCode; 9] = [
        SkillCode::Attack,
        SkillCode::Precision,
        SkillCode::CriticalChance,
        SkillCode::CriticalDamages,
        SkillCode::Armor,
        SkillCode::Dodge,
        SkillCode::Health,
        SkillCode::LootChance,
        SkillCode::Hunger,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SkillCode::Attack => "attack",
            SkillCode::Precision => "precision",
            SkillCode::CriticalChance => "criticalChance",
            SkillCode::CriticalDamages => "criticalDamages",
            SkillCode::Armor => "armor",
            SkillCode::Dodge => "dodge",
            SkillCode::Health => "health",
            SkillCode::LootChance => "lootChance",
            SkillCode::Hunger => "hunger",
        }
    }
}

impl fmt::Display for SkillCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SkillCode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SkillCode::ALL
            .into_iter()
            .find(|code| code.code().eq_ignore_ascii_case(value))
            .ok_or(())
    }
}

impl TryFrom<String> for SkillCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|_| format!("unknown skill '{}'", value))
    }
}

/// Bonus keys an item may carry. `PercentAttack` is only read from
/// ammo and consumable buffs.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum ItemStat {
    Attack,
    Precision,
    CriticalChance,
    CriticalDamages,
    Armor,
    Dodge,
    LootChance,
    PercentAttack,
}

impl ItemStat {
    pub const ALL: [ItemStat; 8] = [
        ItemStat::Attack,
        ItemStat::Precision,
        ItemStat::CriticalChance,
        ItemStat::CriticalDamages,
        ItemStat::Armor,
        ItemStat::Dodge,
        ItemStat::LootChance,
        ItemStat::PercentAttack,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ItemStat::Attack => "attack",
            ItemStat::Precision => "precision",
            ItemStat::CriticalChance => "criticalChance",
            ItemStat::CriticalDamages => "criticalDamages",
            ItemStat::Armor => "armor",
            ItemStat::Dodge => "dodge",
            ItemStat::LootChance => "lootChance",
            ItemStat::PercentAttack => "percentAttack",
        }
    }
}

impl TryFrom<String> for ItemStat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ItemStat::ALL
            .into_iter()
            .find(|stat| stat.code() == value)
            .ok_or_else(|| format!("unknown item stat '{}'", value))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stats: BTreeMap<ItemStat, f64>,
    #[serde(default)]
    pub tier: Option<u8>,
    #[serde(default = "default_durability")]
    pub durability: u32,
}

impl Item {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: code.to_string(),
            stats: BTreeMap::new(),
            tier: None,
            durability: DEFAULT_DURABILITY,
        }
    }

    pub fn with_stat(mut self, stat: ItemStat, value: f64) -> Self {
        self.stats.insert(stat, value);
        self
    }

    pub fn with_durability(mut self, durability: u32) -> Self {
        self.durability = durability;
        self
    }

    pub fn stat(&self, stat: ItemStat) -> f64 {
        self.stats.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    Weapon,
    Ammo,
    Helmet,
    Chest,
    Pants,
    Boots,
    Gloves,
}

impl Slot {
    /// Slots that wear down when an incoming hit lands.
    pub const ARMOR: [Slot; 5] = [
        Slot::Helmet,
        Slot::Chest,
        Slot::Pants,
        Slot::Boots,
        Slot::Gloves,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Slot::Weapon => "weapon",
            Slot::Ammo => "ammo",
            Slot::Helmet => "helmet",
            Slot::Chest => "chest",
            Slot::Pants => "pants",
            Slot::Boots => "boots",
            Slot::Gloves => "gloves",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Equipment {
    #[serde(default)]
    pub weapon: Option<Item>,
    #[serde(default)]
    pub ammo: Option<Item>,
    #[serde(default)]
    pub helmet: Option<Item>,
    #[serde(default)]
    pub chest: Option<Item>,
    #[serde(default)]
    pub pants: Option<Item>,
    #[serde(default)]
    pub boots: Option<Item>,
    #[serde(default)]
    pub gloves: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: Slot) -> Option<&Item> {
        match slot {
            Slot::Weapon => self.weapon.as_ref(),
            Slot::Ammo => self.ammo.as_ref(),
            Slot::Helmet => self.helmet.as_ref(),
            Slot::Chest => self.chest.as_ref(),
            Slot::Pants => self.pants.as_ref(),
            Slot::Boots => self.boots.as_ref(),
            Slot::Gloves => self.gloves.as_ref(),
        }
    }

    /// Bonus a slot contributes to a stat; empty slots contribute nothing.
    pub fn bonus(&self, slot: Slot, stat: ItemStat) -> f64 {
        self.get(slot).map_or(0.0, |item| item.stat(stat))
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ActiveBuffs {
    #[serde(default)]
    pub ammo: Option<Item>,
    #[serde(default)]
    pub consumable: Option<Item>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshot {
    #[serde(default = "default_player_level")]
    pub player_level: u32,
    #[serde(default)]
    pub skill_levels: BTreeMap<SkillCode, u8>,
    #[serde(default)]
    pub equipped_items: Equipment,
    #[serde(default)]
    pub active_buffs: ActiveBuffs,
}

impl Default for CharacterSnapshot {
    fn default() -> Self {
        Self {
            player_level: default_player_level(),
            skill_levels: BTreeMap::new(),
            equipped_items: Equipment::default(),
            active_buffs: ActiveBuffs::default(),
        }
    }
}

impl CharacterSnapshot {
    /// Missing skills count as unlearned.
    pub fn skill_level(&self, code: SkillCode) -> u8 {
        self.skill_levels.get(&code).copied().unwrap_or(0)
    }

    pub fn with_skill(mut self, code: SkillCode, level: u8) -> Self {
        self.skill_levels.insert(code, level);
        self
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodStats {
    #[serde(default)]
    pub health_regen: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub name: String,
    #[serde(default)]
    pub flat_stats: FoodStats,
}

impl FoodItem {
    pub fn new(name: &str, health_regen: f64) -> Self {
        Self {
            name: name.to_string(),
            flat_stats: FoodStats { health_regen },
        }
    }

    pub fn heal_per_use(&self) -> f64 {
        self.flat_stats.health_regen
    }
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_max_ticks() -> u32 {
    DEFAULT_TICK_CEILING
}

fn default_durability() -> u32 {
    DEFAULT_DURABILITY
}

fn default_player_level() -> u32 {
    1
}
