use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{
    CharacterSnapshot, FoodItem, SimConfig, SkillCode, MAX_SKILL_LEVEL, MAX_TICK_CEILING,
};
use crate::monte_carlo::MonteCarloOptions;
use crate::skills::SkillTable;

#[derive(Parser, Debug)]
#[command(name = "build-sim", about = "Simulate character builds in combat")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one encounter and print its tick-by-tick log.
    Simulate(RunArgs),
    /// Run many encounters and print aggregate statistics.
    MonteCarlo(RunArgs),
    /// Run two builds with the same settings and compare them.
    Compare(CompareArgs),
    /// Print resolved stats and skill-point usage for a build.
    ShowBuild(RunArgs),
    /// Print the skill table.
    ListSkills(ListSkillsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SharedArgs {
    #[arg(long, help = "TOML or JSON simulation config")]
    pub config: Option<PathBuf>,
    #[arg(long, value_name = "NAME:HEAL")]
    pub food: Option<String>,
    #[arg(long)]
    pub iterations: Option<usize>,
    #[arg(long)]
    pub max_ticks: Option<u32>,
    #[arg(long, help = "Seed for reproducible runs; omit for entropy")]
    pub seed: Option<u64>,
    #[arg(long, help = "Scale skill values by a random factor in 0.9..=1.1")]
    pub random_factor: bool,
    #[arg(long, help = "TOML or JSON skill table replacing the builtin one")]
    pub skill_table: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "human")]
    pub format: FormatArg,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
    #[arg(long = "skill", value_name = "CODE=LEVEL")]
    pub skills: Vec<String>,
    #[arg(long)]
    pub player_level: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
    #[arg(long, help = "Config file holding build A (the baseline)")]
    pub build_a: PathBuf,
    #[arg(long, help = "Config file holding build B")]
    pub build_b: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ListSkillsArgs {
    #[arg(long)]
    pub skill_table: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "human")]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    #[default]
    Human,
    Summary,
    Json,
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!("failed to read '{}': {}", path.display(), err))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

pub fn load_config(path: &Path) -> Result<SimConfig> {
    load_file(path)
}

/// Character snapshot of a `compare` build file, checked like `--config`.
pub fn load_build(path: &Path) -> Result<CharacterSnapshot> {
    let config = load_config(path)?;
    validate_config(&config)?;
    Ok(config.character)
}

/// Merges the config file (if any) with command-line overrides.
pub fn build_config(args: &RunArgs) -> Result<SimConfig> {
    let mut config = build_shared_config(&args.shared)?;

    for (code, level) in parse_skill_levels(&args.skills)? {
        config.character.skill_levels.insert(code, level);
    }
    if let Some(level) = args.player_level {
        config.character.player_level = level;
    }

    Ok(config)
}

pub fn build_shared_config(args: &SharedArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };

    if let Some(food) = &args.food {
        config.food = Some(parse_food(food)?);
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.random_factor {
        config.random_factor = true;
    }
    if args.skill_table.is_some() {
        config.skill_table = args.skill_table.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SimConfig) -> Result<()> {
    if config.max_ticks == 0 || config.max_ticks > MAX_TICK_CEILING {
        return Err(Error::InvalidTickCeiling {
            got: config.max_ticks,
            max: MAX_TICK_CEILING,
        });
    }
    for (code, level) in &config.character.skill_levels {
        if *level > MAX_SKILL_LEVEL {
            return Err(Error::SkillLevelOutOfRange {
                entry: format!("{}={}", code, level),
                max: MAX_SKILL_LEVEL,
            });
        }
    }
    Ok(())
}

pub fn load_skill_table(path: Option<&Path>) -> Result<SkillTable> {
    match path {
        Some(path) => SkillTable::load(path),
        None => SkillTable::builtin(),
    }
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn monte_carlo_options(config: &SimConfig) -> MonteCarloOptions {
    MonteCarloOptions {
        iterations: config.iterations,
        tick_ceiling: config.max_ticks,
        seed: config.seed,
        random_factor: config.random_factor,
    }
}

pub fn parse_skill_levels(entries: &[String]) -> Result<Vec<(SkillCode, u8)>> {
    let mut levels = Vec::new();
    let mut seen = HashSet::new();

    for entry in entries {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptySkillEntry);
        }

        let (code_str, level_str) = trimmed
            .split_once('=')
            .map(|(code, level)| (code.trim(), level.trim()))
            .ok_or_else(|| Error::InvalidSkillEntry(trimmed.to_string()))?;
        if code_str.is_empty() || level_str.is_empty() {
            return Err(Error::InvalidSkillEntry(trimmed.to_string()));
        }

        let code: SkillCode = code_str
            .parse()
            .map_err(|_| Error::UnknownSkill(code_str.to_string()))?;
        if !seen.insert(code) {
            return Err(Error::DuplicateSkill(code.to_string()));
        }

        let level: u8 = level_str
            .parse()
            .map_err(|_| Error::InvalidSkillLevel(trimmed.to_string()))?;
        if level > MAX_SKILL_LEVEL {
            return Err(Error::SkillLevelOutOfRange {
                entry: trimmed.to_string(),
                max: MAX_SKILL_LEVEL,
            });
        }

        levels.push((code, level));
    }

    Ok(levels)
}

pub fn parse_food(input: &str) -> Result<FoodItem> {
    let trimmed = input.trim();
    let (name, heal_str) = trimmed
        .rsplit_once(':')
        .map(|(name, heal)| (name.trim(), heal.trim()))
        .ok_or_else(|| Error::InvalidFoodEntry(trimmed.to_string()))?;
    if name.is_empty() || heal_str.is_empty() {
        return Err(Error::InvalidFoodEntry(trimmed.to_string()));
    }

    let heal: f64 = heal_str
        .parse()
        .map_err(|_| Error::InvalidFoodHeal(trimmed.to_string()))?;
    if !heal.is_finite() || heal < 0.0 {
        return Err(Error::InvalidFoodHeal(trimmed.to_string()));
    }

    Ok(FoodItem::new(name, heal))
}
