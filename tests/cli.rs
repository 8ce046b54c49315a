#![cfg(feature = "cli")]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TestEnv {
    _tmp: TempDir,
    db: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let db = tmp.path().join("password_security.db");
        Self { _tmp: tmp, db }
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("pwd-hygiene");
        cmd.env_remove("PWD_HYGIENE_DB_PATH")
            .arg("--db")
            .arg(&self.db);
        cmd
    }

    fn submit(&self, username: &str, password: &str) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(["submit", "--username", username])
            .write_stdin(format!("{}\n", password))
            .assert()
    }

    fn db(&self) -> &Path {
        &self.db
    }
}

#[test]
fn check_prints_tier_and_violations() {
    cargo_bin_cmd!("pwd-hygiene")
        .arg("check")
        .write_stdin("password1\n")
        .assert()
        .success()
        .stdout(contains("Password Strength: Moderate"))
        .stdout(contains("Password must contain at least one uppercase letter."))
        .stdout(contains("Password must contain at least one special character."))
        .stdout(contains("digit").not());
}

#[test]
fn check_does_not_create_database() {
    let env = TestEnv::new();
    env.cmd()
        .arg("check")
        .write_stdin("Str0ng!Pass\n")
        .assert()
        .success()
        .stdout(contains("Password Strength: Strong"))
        .stdout(contains("Policy Violations").not());
    assert!(!env.db().exists());
}

#[test]
fn submit_then_reuse_is_rejected() {
    let env = TestEnv::new();

    env.submit("alice", "weakpass")
        .success()
        .stdout(contains("Password Strength: Weak"))
        .stdout(contains("User added successfully."))
        .stdout(contains("- alice"));

    env.submit("bob", "weakpass")
        .code(2)
        .stdout(contains("Password is reused!"))
        .stdout(contains("- bob").not());

    env.cmd()
        .arg("users")
        .assert()
        .success()
        .stdout("alice\n");
}

#[test]
fn submit_rejects_empty_username() {
    let env = TestEnv::new();
    env.submit("  ", "Str0ng!Pass")
        .failure()
        .stderr(contains("Username must not be empty"));
}

#[test]
fn report_and_history_json() {
    let env = TestEnv::new();
    env.submit("alice", "weakpass").success();
    env.submit("bob", "password1").success();
    env.submit("carol", "Str0ng!Pass").success();

    env.cmd().args(["report", "--json"]).assert().success();
    env.submit("dave", "abc").success();
    env.cmd().arg("report").assert().success().stdout(contains("violations"));

    let output = env
        .cmd()
        .args(["history", "--json"])
        .output()
        .expect("run history");
    assert!(output.status.success());

    let history: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let rows = history.as_array().expect("array of reports");
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["weak_count"], 1);
    assert_eq!(rows[0]["moderate_count"], 1);
    assert_eq!(rows[0]["strong_count"], 1);
    assert_eq!(rows[0]["total_violations"], 5);

    assert_eq!(rows[1]["weak_count"], 2);
    assert_eq!(rows[1]["total_violations"], 9);

    let t0 = rows[0]["report_time"].as_str().expect("timestamp");
    let t1 = rows[1]["report_time"].as_str().expect("timestamp");
    let t0: chrono::DateTime<chrono::Utc> = t0.parse().expect("rfc3339");
    let t1: chrono::DateTime<chrono::Utc> = t1.parse().expect("rfc3339");
    assert!(t0 <= t1);
}

#[test]
fn history_empty() {
    let env = TestEnv::new();
    env.cmd()
        .arg("history")
        .assert()
        .success()
        .stdout(contains("No reports yet."));
}

#[test]
fn db_path_from_env() {
    let env = TestEnv::new();
    cargo_bin_cmd!("pwd-hygiene")
        .env("PWD_HYGIENE_DB_PATH", env.db())
        .args(["submit", "--username", "alice"])
        .write_stdin("Str0ng!Pass\n")
        .assert()
        .success();

    env.cmd()
        .arg("users")
        .assert()
        .success()
        .stdout("alice\n");
}
