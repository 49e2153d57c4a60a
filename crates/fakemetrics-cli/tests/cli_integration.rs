//! CLI integration tests for the `fakemetrics` binary.

#![allow(clippy::unwrap_used)] // Tests can use unwrap

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fakemetrics() -> Command {
    Command::cargo_bin("fakemetrics").expect("Failed to find fakemetrics binary")
}

/// `run` with raw/clean paths inside `dir`.
fn run_in(dir: &Path) -> Command {
    let mut cmd = fakemetrics();
    cmd.arg("run")
        .arg("--raw")
        .arg(dir.join("raw").join("dataset.csv"))
        .arg("--clean")
        .arg(dir.join("processed").join("clean.csv"));
    cmd
}

fn summary_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is a JSON summary")
}

// ============================================================================
// Help / Version
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    fakemetrics()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("describe"));
}

#[test]
fn test_version() {
    fakemetrics()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fakemetrics"));
}

#[test]
fn test_unknown_method_rejected() {
    let dir = TempDir::new().unwrap();
    run_in(dir.path())
        .args(["--method", "kmeans"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("kmeans"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_json_summary() {
    let dir = TempDir::new().unwrap();
    let out = run_in(dir.path())
        .args(["--samples", "200", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary = summary_json(&out);
    let count = summary["anomaly_count"].as_u64().unwrap();
    assert!((5..=15).contains(&count), "anomaly_count = {count}");
    assert!(summary["total_views"].as_f64().unwrap() > 0.0);
    assert!(summary["like_view_ratio"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_run_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let first = run_in(dir.path())
        .args(["--samples", "150", "--seed", "9", "--json"])
        .output()
        .unwrap();
    let second = run_in(dir.path())
        .args(["--samples", "150", "--seed", "9", "--json"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_run_without_persist_writes_nothing() {
    let dir = TempDir::new().unwrap();
    run_in(dir.path()).args(["--samples", "50"]).assert().success();
    assert!(!dir.path().join("raw").exists());
    assert!(!dir.path().join("processed").exists());
}

#[test]
fn test_run_persist_writes_both_files() {
    let dir = TempDir::new().unwrap();
    run_in(dir.path())
        .args(["--samples", "50", "--persist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("anomaly_count"));

    let raw = fs::read_to_string(dir.path().join("raw").join("dataset.csv")).unwrap();
    let clean = fs::read_to_string(dir.path().join("processed").join("clean.csv")).unwrap();
    assert!(raw.starts_with("views,likes\n"));
    assert!(clean.starts_with("views,likes,like_view_ratio\n"));
    assert_eq!(raw.lines().count(), 51);
}

#[test]
fn test_run_both_methods() {
    let dir = TempDir::new().unwrap();
    run_in(dir.path())
        .args(["--samples", "120", "--method", "isolation_forest,lof"])
        .assert()
        .success()
        .stdout(predicate::str::contains("isolation_forest, lof"));
}

#[test]
fn test_run_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pipeline.toml");
    fs::write(
        &config,
        format!(
            "sample_count = 80\nraw_path = {:?}\nclean_path = {:?}\nmethods = [\"lof\"]\n",
            dir.path().join("raw.csv").display().to_string(),
            dir.path().join("clean.csv").display().to_string(),
        ),
    )
    .unwrap();

    fakemetrics()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("80"))
        .stdout(predicate::str::contains("lof"));
}

#[test]
fn test_run_bad_contamination_exit_code() {
    let dir = TempDir::new().unwrap();
    run_in(dir.path())
        .args(["--contamination", "0.9"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("contamination"));
}

#[test]
fn test_run_malformed_raw_file_exit_code() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw").join("dataset.csv");
    fs::create_dir_all(raw.parent().unwrap()).unwrap();
    fs::write(&raw, "views,likes\n10,ten\n").unwrap();

    run_in(dir.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("dataset.csv"));
}

#[test]
fn test_run_constant_column_exit_code() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw").join("dataset.csv");
    fs::create_dir_all(raw.parent().unwrap()).unwrap();
    fs::write(&raw, "views,likes\n10,1\n10,2\n10,3\n").unwrap();

    run_in(dir.path())
        .assert()
        .code(6)
        .stderr(predicate::str::contains("zero variance"));
}

// ============================================================================
// describe
// ============================================================================

#[test]
fn test_describe_table() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("data.csv");
    fs::write(&file, "views,likes\n100,10\n200,30\n,20\n").unwrap();

    fakemetrics()
        .arg("describe")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("views"))
        .stdout(predicate::str::contains("150.0000"));
}

#[test]
fn test_describe_json() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("data.csv");
    fs::write(&file, "views,likes\n100,10\n200,30\n300,20\n").unwrap();

    let out = fakemetrics()
        .arg("describe")
        .arg(&file)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stats: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(stats[0]["name"], "views");
    assert_eq!(stats[0]["count"], 3);
    assert_eq!(stats[1]["median"], 20.0);
}

#[test]
fn test_describe_missing_file() {
    fakemetrics()
        .arg("describe")
        .arg("/nonexistent/data.csv")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("File not found"));
}
