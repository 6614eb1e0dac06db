//! Corruption recovery tests for wtimer.
//!
//! These tests verify the system can handle:
//! - Corrupted trainings and custom exercise files
//! - Data written before rest times existed
//! - Trainings referencing exercises that no longer exist

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(temp_dir.path().join("data")).unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[sound]\nenabled = false\n",
    )
    .unwrap();
    temp_dir
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wtimer"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

#[test]
fn test_corrupted_trainings_file() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/trainings.json"),
        "{ invalid json }}}}",
    )
    .unwrap();

    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No trainings yet"));
}

#[test]
fn test_corrupted_trainings_replaced_on_next_save() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("data/trainings.json");
    fs::write(&path, "[{\"id\": 1").unwrap();

    cli(temp_dir.path())
        .args(["create", "--name", "Fresh", "--exercise", "plank"])
        .assert()
        .success();

    let raw = fs::read_to_string(&path).unwrap();
    let trainings: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(trainings[0]["name"], "Fresh");
}

#[test]
fn test_corrupted_custom_exercises_keeps_defaults() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/custom_exercises.json"),
        "not json at all",
    )
    .unwrap();

    cli(temp_dir.path())
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jumping Jacks"));
}

#[test]
fn test_missing_rest_time_defaults_to_thirty() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/trainings.json"),
        r#"[{"id":"old-1","name":"Legacy","exercises":[{"id":"e1","exerciseId":"squats","duration":20},{"id":"e2","exerciseId":"plank","duration":20}]}]"#,
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["show", "old-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rest between exercises: 30s"))
        .stdout(predicate::str::contains("Sequence: 3 items, total 01:10"));
}

#[test]
fn test_unknown_exercise_reference_is_reported() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/trainings.json"),
        r#"[{"id":"t1","name":"Mixed","restTime":5,"exercises":[{"id":"e1","exerciseId":"gone","duration":20},{"id":"e2","exerciseId":"squats","duration":4}]}]"#,
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["show", "Mixed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Exercise"))
        .stdout(predicate::str::contains("Unknown exercise 'gone'"))
        .stdout(predicate::str::contains("Sequence: 1 items, total 00:04"));

    cli(temp_dir.path())
        .args(["run", "Mixed", "--auto", "--tick-ms", "5"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise 2 of 2"))
        .stdout(predicate::str::contains("Training complete!"));
}

#[test]
fn test_training_with_only_unknown_exercises_has_nothing_to_play() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/trainings.json"),
        r#"[{"id":"t1","name":"Ghost","restTime":5,"exercises":[{"id":"e1","exerciseId":"gone","duration":20}]}]"#,
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["run", "Ghost", "--auto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to play"));
}
