use predicates::str::contains;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_file(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be available")
        .as_nanos();
    let unique = COUNTER.fetch_add(1, Ordering::SeqCst);
    path.push(format!("build-sim-errors-{}-{}.{}", nanos, unique, extension));
    fs::write(&path, contents).expect("temp file write should succeed");
    path
}

#[test]
fn unknown_skill_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["simulate", "--skill", "stamina=2"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: unknown skill 'stamina'"));
}

#[test]
fn skill_level_above_max_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["monte-carlo", "--skill", "attack=11"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: skill level must be <= 10 in 'attack=11'"));
}

#[test]
fn duplicate_skill_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["show-build", "--skill", "dodge=1", "--skill", "dodge=2"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: duplicate skill 'dodge'"));
}

#[test]
fn malformed_food_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["simulate", "--food", "bread"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: invalid food entry 'bread': expected name:heal"));
}

#[test]
fn negative_heal_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["simulate", "--food", "bread:-3"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: invalid heal amount in 'bread:-3'"));
}

#[test]
fn zero_tick_ceiling_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["simulate", "--max-ticks", "0"]);
    cmd.assert().failure().stderr(contains(
        "Error: tick ceiling must be between 1 and 5000 (got 0)",
    ));
}

#[test]
fn tick_ceiling_above_max_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["monte-carlo", "--max-ticks", "5001"]);
    cmd.assert().failure().stderr(contains(
        "Error: tick ceiling must be between 1 and 5000 (got 5001)",
    ));
}

#[test]
fn missing_config_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["simulate", "--config", "no-such-build.toml"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: failed to read 'no-such-build.toml'"));
}

#[test]
fn unsupported_config_format_fails() {
    let config = write_temp_file("iterations: 3\n", "yaml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["simulate", "--config", config.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: unsupported config format 'yaml'"));
}

#[test]
fn malformed_toml_config_fails() {
    let config = write_temp_file("iterations = [\n", "toml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["monte-carlo", "--config", config.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: failed to parse TOML"));
}

#[test]
fn skill_table_without_base_level_fails() {
    let table = write_temp_file(
        r#"{"attack": {"1": {"value": 30, "cost": 1, "unlockAtLevel": 1}}}"#,
        "json",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["list-skills", "--skill-table", table.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: skill table has no level 0 for"));
}

#[test]
fn compare_requires_both_builds() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["compare", "--build-a", "a.toml"]);
    cmd.assert().failure().stderr(contains("--build-b"));
}

#[test]
fn config_skill_level_above_max_fails() {
    let config = write_temp_file("[character]\nskillLevels = { dodge = 42 }\n", "toml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["show-build", "--config", config.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: skill level must be <= 10 in 'dodge=42'"));
}

#[test]
fn compare_build_level_above_max_fails() {
    let build_a = write_temp_file("[character]\n", "toml");
    let build_b = write_temp_file("[character]\nskillLevels = { armor = 11 }\n", "toml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args([
        "compare",
        "--build-a",
        build_a.to_str().unwrap(),
        "--build-b",
        build_b.to_str().unwrap(),
    ]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: skill level must be <= 10 in 'armor=11'"));
}
