use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn level_forge() -> Command {
    let mut cmd = Command::cargo_bin("level-forge").unwrap();
    cmd.env("RUST_LOG", "info")
        .env_remove("LEVEL_FORGE_CONFIG_FILE")
        .env_remove("LEVEL_FORGE_MAX_STYLE_ATTEMPTS");
    cmd
}

fn data_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("level-gen")
        .join("data")
}

#[test]
fn test_generate_writes_level_files() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let out = tmp_dir.path().join("out");

    level_forge()
        .args(["generate", "--seed", "1", "--size", "small", "--json", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Level generation completed successfully.",
        ));

    let csv = fs::read_to_string(out.join("level.csv"))?;
    assert_eq!(csv.lines().count(), 32);
    assert!(csv.lines().all(|l| l.split(',').count() == 40));
    assert_eq!(csv.matches("SH").count(), 1);
    assert_eq!(csv.matches("XF").count(), 1);

    let path = fs::read_to_string(out.join("path.txt"))?;
    assert!(path.trim().split(',').count() >= 4);
    assert!(out.join("level.json").exists());
    Ok(())
}

#[test]
fn test_same_seed_same_files() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    for name in ["a", "b"] {
        level_forge()
            .args(["generate", "--seed", "42", "--style", "cave", "--output-dir"])
            .arg(tmp_dir.path().join(name))
            .assert()
            .success();
    }
    assert_eq!(
        fs::read(tmp_dir.path().join("a").join("level.csv"))?,
        fs::read(tmp_dir.path().join("b").join("level.csv"))?
    );
    Ok(())
}

#[test]
fn test_dump_phases_and_png() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let out = tmp_dir.path().join("out");
    let png = tmp_dir.path().join("preview.png");

    level_forge()
        .args(["generate", "--seed", "5", "--dump-phases", "--png-scale", "2", "--output-dir"])
        .arg(&out)
        .arg("--png")
        .arg(&png)
        .assert()
        .success();

    for name in ["sections.txt", "assembled.txt", "archetypes.txt", "types.txt"] {
        assert!(out.join(name).exists(), "{name} missing");
    }
    assert!(fs::read_to_string(out.join("assembled.txt"))?.contains('*'));
    let bytes = fs::read(&png)?;
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    Ok(())
}

#[test]
fn test_terminal_visualization_prints_the_level() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    level_forge()
        .env("NO_COLOR", "1")
        .args(["generate", "--seed", "3", "--visualization-mode", "terminal", "--output-dir"])
        .arg(tmp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Small level, style general, seed 3"))
        .stdout(predicate::str::contains("H"));
    Ok(())
}

#[test]
fn test_restyle_keeps_the_path() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let base = tmp_dir.path().join("base");
    let restyled = tmp_dir.path().join("restyled");

    level_forge()
        .args(["generate", "--seed", "9", "--output-dir"])
        .arg(&base)
        .assert()
        .success();
    level_forge()
        .args(["restyle", "--path-seed", "9", "--style-seed", "77", "--style", "dungeon"])
        .arg("--output-dir")
        .arg(&restyled)
        .assert()
        .success()
        .stderr(predicate::str::contains("Restyle completed successfully."));

    assert_eq!(
        fs::read_to_string(base.join("path.txt"))?,
        fs::read_to_string(restyled.join("path.txt"))?
    );
    Ok(())
}

#[test]
fn test_train_writes_models() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let models = tmp_dir.path().join("models");

    level_forge()
        .arg("train")
        .arg("--data-dir")
        .arg(data_dir())
        .arg("--output-dir")
        .arg(&models)
        .assert()
        .success()
        .stderr(predicate::str::contains("Training completed successfully."));

    for name in ["archetypes.ron", "cave.ron", "grass.ron", "dungeon.ron", "general.ron"] {
        assert!(models.join(name).exists(), "{name} missing");
    }
    Ok(())
}

#[test]
fn test_missing_config_file_fails() {
    level_forge()
        .args(["generate", "--config", "/nonexistent/level-forge.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Settings file not found"));
}

#[test]
fn test_env_override_reaches_the_generator() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    level_forge()
        .env("LEVEL_FORGE_MAX_STYLE_ATTEMPTS", "0")
        .args(["generate", "--seed", "1", "--output-dir"])
        .arg(tmp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Style pass unsatisfiable after 0 attempts"));
    Ok(())
}

#[test]
fn test_settings_file_reaches_the_generator() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let settings = tmp_dir.path().join("settings.toml");
    fs::write(&settings, "max_style_attempts = 0\n")?;

    level_forge()
        .args(["generate", "--seed", "1", "--config"])
        .arg(&settings)
        .arg("--output-dir")
        .arg(tmp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsatisfiable"));
    Ok(())
}

#[test]
fn test_invalid_size_fails() {
    level_forge()
        .args(["generate", "--size", "gigantic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
