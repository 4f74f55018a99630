mod common;

use anyhow::Result;
use assert_cmd::Command;
use common::Workspace;
use predicates::prelude::*;
use serde_json::json;
use std::fs;

fn confmig(ws: &Workspace) -> Result<Command> {
    let mut cmd = Command::cargo_bin("confmig")?;
    cmd.env("HOME", ws.path())
        .env("CONFMIG_SETTINGS_PATH", ws.path().join("no-settings.toml"))
        .env_remove("CONFMIG_LOG");
    Ok(cmd)
}

#[test]
fn test_migrate_writes_sibling_output() -> Result<()> {
    let ws = Workspace::new()?;
    let root = ws.legacy_config("legacy")?;

    confmig(&ws)?
        .arg("migrate")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("23.12.04"));

    let species = ws.read_json("legacy_updated/species/mite.json")?;
    assert_eq!(species["version"], json!("23.12.04"));
    Ok(())
}

#[test]
fn test_migrate_refuses_existing_output() -> Result<()> {
    let ws = Workspace::new()?;
    let root = ws.legacy_config("legacy")?;
    fs::create_dir(ws.path().join("legacy_updated"))?;

    confmig(&ws)?
        .arg("migrate")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("already exists"));

    confmig(&ws)?
        .args(["migrate", "--overwrite"])
        .arg(&root)
        .assert()
        .success();
    assert!(ws.path().join("legacy_updated/simulation_params.json").exists());
    Ok(())
}

#[test]
fn test_migrate_to_baseline_copies_tree() -> Result<()> {
    let ws = Workspace::new()?;
    let root = ws.legacy_config("legacy")?;

    confmig(&ws)?
        .args(["migrate", "--to", "23.11.05", "--quiet"])
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert_eq!(
        ws.read_json("legacy_updated/resource/moss.json")?,
        common::resource("moss")
    );
    Ok(())
}

#[test]
fn test_migrate_unknown_target() -> Result<()> {
    let ws = Workspace::new()?;
    let root = ws.legacy_config("legacy")?;

    confmig(&ws)?
        .args(["migrate", "--to", "99.1.1"])
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("99.01.01"));
    assert!(!ws.path().join("legacy_updated").exists());
    Ok(())
}

#[test]
fn test_single_applies_literal_values() -> Result<()> {
    let ws = Workspace::new()?;
    let root = ws.legacy_config("base")?;
    let mods = ws.write_json(
        "mods.json",
        &json!({
            "species/mite.json:animal/name": "tick",
            "simulation_params.json:simulation/timeSteps": 5
        }),
    )?;

    confmig(&ws)?
        .arg("single")
        .arg(&root)
        .arg(&mods)
        .arg(ws.path().join("runs"))
        .arg("3")
        .assert()
        .success();

    assert_eq!(ws.read_json("runs/base_3/species/mite.json")?["animal"]["name"], json!("tick"));
    assert_eq!(
        ws.read_json("runs/base_3/simulation_params.json")?["simulation"]["timeSteps"],
        json!(5)
    );
    Ok(())
}

#[test]
fn test_single_rejects_malformed_key() -> Result<()> {
    let ws = Workspace::new()?;
    let root = ws.legacy_config("base")?;
    let mods = ws.write_json("mods.json", &json!({"species/mite.json": 1}))?;

    confmig(&ws)?
        .arg("single")
        .arg(&root)
        .arg(&mods)
        .arg(ws.path().join("runs"))
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file/path.json:item/path"));
    Ok(())
}

#[test]
fn test_combinations_cover_the_product() -> Result<()> {
    let ws = Workspace::new()?;
    let root = ws.legacy_config("base")?;
    let mods = ws.write_json(
        "mods.json",
        &json!({
            "resource/algae.json:resource/cellMass": [0.1, 0.2],
            "simulation_params.json:simulation/timeSteps": [10, 20, 30]
        }),
    )?;
    let out = ws.path().join("grid");
    fs::create_dir_all(out.join("stale"))?;

    confmig(&ws)?
        .arg("combinations")
        .arg(&root)
        .arg(&mods)
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Created 6 configurations"));

    assert!(!out.join("stale").exists());
    let first = ws.read_json("grid/base_1/resource/algae.json")?;
    assert_eq!(first["resource"]["cellMass"], json!(0.1));
    let second = ws.read_json("grid/base_2/simulation_params.json")?;
    assert_eq!(second["simulation"]["timeSteps"], json!(20));
    let last = ws.read_json("grid/base_6/resource/algae.json")?;
    assert_eq!(last["resource"]["cellMass"], json!(0.2));
    assert!(!out.join("base_7").exists());
    Ok(())
}

#[test]
fn test_versions_lists_catalog() -> Result<()> {
    let ws = Workspace::new()?;

    confmig(&ws)?
        .arg("versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("23.11.05"))
        .stdout(predicate::str::contains("23.12.04"))
        .stdout(predicate::str::contains("(latest)"));
    Ok(())
}

#[test]
fn test_invalid_settings_fail_early() -> Result<()> {
    let ws = Workspace::new()?;
    let settings = ws.path().join("settings.toml");
    fs::write(&settings, "[output]\nindent = 0\n")?;

    confmig(&ws)?
        .arg("--settings")
        .arg(&settings)
        .arg("versions")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_completion_needs_no_settings() -> Result<()> {
    let ws = Workspace::new()?;

    confmig(&ws)?
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("confmig"));
    Ok(())
}
