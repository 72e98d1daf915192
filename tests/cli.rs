use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LINE: &str = r#"{"timestamp":"2024-06-01T12:00:00Z","message":{"model":"claude-sonnet","usage":{"input":100,"output":50,"cacheRead":10,"cacheWrite":5,"cost":{"total":0.02}}}}"#;

/// Temp install with one fresh `bug-hunter` session and an isolated config file
fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let sessions = tmp.path().join("agents").join("bug-hunter").join("sessions");
    fs::create_dir_all(&sessions).unwrap();
    fs::write(
        sessions.join("abc123.jsonl"),
        format!("{{\"type\":\"session\"}}\n{{\"usage\":{{\"cost\":\n{LINE}\n"),
    )
    .unwrap();
    tmp
}

fn cmd(tmp: &Path) -> Command {
    let mut cmd = Command::cargo_bin("agentmeter-server").unwrap();
    cmd.env_remove("AGENTMETER_AGENTS_DIR")
        .env_remove("AGENTMETER_PORT")
        .env("RUST_LOG", "warn")
        .arg("--config")
        .arg(tmp.join("config.toml"))
        .arg("--agents-dir")
        .arg(tmp.join("agents"));
    cmd
}

#[test]
fn usage_json_lists_records() {
    let tmp = fixture();
    let output = cmd(tmp.path())
        .args(["usage", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["agent"], "Bug Hunter");
    assert_eq!(records[0]["inputTokens"], 115);
    assert_eq!(records[0]["provider"], "Anthropic");
}

#[test]
fn sessions_json_lists_active_session() {
    let tmp = fixture();
    let output = cmd(tmp.path())
        .args(["sessions", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let sessions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(sessions[0]["id"], "abc123");
    assert_eq!(sessions[0]["contextLimit"], 200_000);
    assert_eq!(sessions[0]["messageCount"], 1);
}

#[test]
fn usage_summary_names_agent() {
    let tmp = fixture();
    cmd(tmp.path())
        .env("NO_COLOR", "1")
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bug Hunter"))
        .stdout(predicate::str::contains("By Agent:"));
}

#[test]
fn doctor_reports_configured_path() {
    let tmp = fixture();
    cmd(tmp.path())
        .env("NO_COLOR", "1")
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom path"))
        .stdout(predicate::str::contains("opus-4-6"))
        .stdout(predicate::str::contains("1 lines dropped"));
}

#[test]
fn missing_agents_dir_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let output = cmd(tmp.path())
        .args(["usage", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "[]");
}

#[test]
fn invalid_bind_address_fails() {
    let tmp = fixture();
    cmd(tmp.path())
        .args(["serve", "--bind", "not-an-ip", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid bind address"));
}
