use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::load_file;
use crate::error::{Error, Result};
use crate::models::SkillCode;

const BUILTIN_TABLE: &str = include_str!("../data/skills.json");
const LEVEL_KEYS: [&str; 11] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillLevelData {
    pub value: f64,
    pub cost: u32,
    pub unlock_at_level: u32,
}

/// Per-skill level data keyed by level string ("0" through "10").
///
/// Read-only once loaded; every run in a batch shares one table.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct SkillTable {
    levels: BTreeMap<SkillCode, BTreeMap<String, SkillLevelData>>,
}

impl SkillTable {
    pub fn builtin() -> Result<Self> {
        let table: SkillTable = serde_json::from_str(BUILTIN_TABLE).map_err(|err| {
            Error::ConfigParse(format!("failed to parse builtin skill table: {}", err))
        })?;
        table.validate()?;
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let table: SkillTable = load_file(path)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_levels(
        levels: BTreeMap<SkillCode, BTreeMap<String, SkillLevelData>>,
    ) -> Result<Self> {
        let table = SkillTable { levels };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<()> {
        for code in SkillCode::ALL {
            if self.level(code, 0).is_none() {
                return Err(Error::IncompleteSkillTable(code));
            }
        }
        Ok(())
    }

    pub fn level(&self, code: SkillCode, level: u8) -> Option<&SkillLevelData> {
        let key = LEVEL_KEYS.get(level as usize)?;
        self.levels.get(&code).and_then(|levels| levels.get(*key))
    }

    /// Base contribution of a skill, zero when the level is absent.
    pub fn value(&self, code: SkillCode, level: u8) -> f64 {
        self.level(code, level).map_or(0.0, |data| data.value)
    }

    pub fn levels(&self, code: SkillCode) -> Vec<(u8, SkillLevelData)> {
        let mut entries: Vec<(u8, SkillLevelData)> = self
            .levels
            .get(&code)
            .map(|levels| {
                levels
                    .iter()
                    .filter_map(|(key, data)| key.parse::<u8>().ok().map(|lvl| (lvl, *data)))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by_key(|(lvl, _)| *lvl);
        entries
    }
}
