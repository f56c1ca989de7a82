//! Testes de integração para a CLI do Abacus.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn abacus_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_abacus"))
}

/// Escreve uma configuração com o banco dentro do diretório temporário.
fn write_config(dir: &Path) -> PathBuf {
    let config_path = dir.join("abacus.toml");
    let db_path = dir.join("abacus.db");
    let content = format!(
        "[general]\nlog_level = \"warn\"\n\n[store]\nbackend = \"sqlite\"\ndb_path = {:?}\n",
        db_path.display().to_string()
    );
    fs::write(&config_path, content).expect("Failed to write config");
    config_path
}

#[test]
fn test_version_command() {
    abacus_bin()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("abacus"));
}

#[test]
fn test_help_command() {
    abacus_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("serve"))
                .and(predicate::str::contains("calculate"))
                .and(predicate::str::contains("history"))
                .and(predicate::str::contains("doctor")),
        );
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("abacus.toml");

    abacus_bin()
        .arg("init")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success();

    assert!(config_path.exists(), "Config file was not created");
    assert!(temp_dir.path().join(".abacus").join("abacus.db").exists());

    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[general]"));
    assert!(content.contains("[server]"));
    assert!(content.contains("[calculator]"));
    assert!(content.contains("[store]"));
    assert!(content.contains("[history]"));
}

#[test]
fn test_calculate_twice_hits_cache() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["calculate", "2", "+", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.00 + 3.00 = 5.00").and(predicate::str::contains("computed")));

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["calculate", "2", "+", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cached"));

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["history", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 operation(s)"));
}

#[test]
fn test_calculate_negative_operand() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["calculate", "-2.5", "*", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-2.50 * 4.00 = -10.00"));
}

#[test]
fn test_division_by_zero_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["calculate", "10", "/", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DivisionByZero"));
}

#[test]
fn test_show_missing_operation_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["show", "999"])
        .assert()
        .failure();
}

#[test]
fn test_clear_with_yes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["calculate", "1", "-", "1"])
        .assert()
        .success();

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 operation(s) removed"));
}

#[test]
fn test_doctor_command_runs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Diagnosing"));
}

#[test]
fn test_invalid_command() {
    abacus_bin()
        .arg("invalid-command-that-does-not-exist")
        .assert()
        .failure();
}

#[test]
fn test_verbose_flag() {
    abacus_bin().arg("-v").arg("version").assert().success();
}

#[test]
fn test_quiet_flag() {
    abacus_bin().arg("-q").arg("version").assert().success();
}

#[test]
fn test_default_policy_rounds_operands_up() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path());

    abacus_bin()
        .arg("--config")
        .arg(&config_path)
        .args(["calculate", "1.001", "+", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.01 + 1.00 = 2.01"));
}
