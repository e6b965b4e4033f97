use predicates::str::{contains, diff};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn write_temp_config(contents: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be available")
        .as_nanos();
    path.push(format!("build-sim-build-{}-{}.toml", std::process::id(), nanos));
    fs::write(&path, contents).expect("config write should succeed");
    path
}

#[test]
fn list_skills_prints_supported_codes() {
    let expected = concat!(
        "attack\n",
        "precision\n",
        "criticalChance\n",
        "criticalDamages\n",
        "armor\n",
        "dodge\n",
        "health\n",
        "lootChance\n",
        "hunger\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["list-skills", "--format", "summary"]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn list_skills_human_shows_level_data() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.arg("list-skills");
    cmd.assert()
        .success()
        .stdout(contains("attack:\n  0: value 20, cost 0, unlocks at 0\n"))
        .stdout(contains("  10: value 120, cost 55, unlocks at 19\n"));
}

#[test]
fn show_build_reports_issues() {
    let expected = concat!(
        "health: 50.0\n",
        "hunger: 4\n",
        "skill points: 10/8\n",
        "Issues:\n",
        "- attack level 4 unlocks at player level 7 (player is 2)\n",
        "- 10 skill points spent, budget is 8\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args([
        "show-build",
        "--skill",
        "attack=4",
        "--player-level",
        "2",
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn show_build_breaks_down_every_stat() {
    let config = write_temp_config(
        r#"
[character.equippedItems.weapon]
code = "rifle"
name = "Rifle"
stats = { attack = 30.0 }

[character.activeBuffs.ammo]
code = "heavy-ammo"
stats = { percentAttack = 20.0 }
"#,
    );
    let expected = concat!(
        "Player level: 1\n",
        "Stats:\n",
        "attack: 60.0 (skill 20.0, equipment 30.0 from Rifle, ammo +20.0%)\n",
        "precision: 50.0 (skill 50.0, equipment 0.0)\n",
        "criticalChance: 10.0 (skill 10.0, equipment 0.0 from Rifle)\n",
        "criticalDamages: 100.0 (skill 100.0, equipment 0.0)\n",
        "armor: 0.0 (skill 0.0, equipment 0.0)\n",
        "dodge: 0.0 (skill 0.0, equipment 0.0)\n",
        "lootChance: 5.0 (skill 5.0, equipment 0.0)\n",
        "health: 50.0\n",
        "hunger: 4\n",
        "skill points: 0/4\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["show-build", "--config", config.to_str().unwrap()]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn show_build_json_lists_resolved_stats() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-sim");
    cmd.args(["show-build", "--skill", "dodge=2", "--format", "json"]);
    cmd.assert()
        .success()
        .stdout(contains("\"stat\": \"dodge\""))
        .stdout(contains("\"skillPointsSpent\": 3"));
}
