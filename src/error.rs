use thiserror::Error;

use crate::models::SkillCode;

#[derive(Error, Debug)]
pub enum Error {
    #[error("skills must not contain empty entries")]
    EmptySkillEntry,
    #[error("invalid skill entry '{0}': expected code=level")]
    InvalidSkillEntry(String),
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
    #[error("invalid skill level in '{0}'")]
    InvalidSkillLevel(String),
    #[error("skill level must be <= {max} in '{entry}'")]
    SkillLevelOutOfRange { entry: String, max: u8 },
    #[error("duplicate skill '{0}'")]
    DuplicateSkill(String),
    #[error("invalid food entry '{0}': expected name:heal")]
    InvalidFoodEntry(String),
    #[error("invalid heal amount in '{0}'")]
    InvalidFoodHeal(String),
    #[error("tick ceiling must be between 1 and {max} (got {got})")]
    InvalidTickCeiling { got: u32, max: u32 },
    #[error("skill table has no level 0 for '{0}'")]
    IncompleteSkillTable(SkillCode),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
