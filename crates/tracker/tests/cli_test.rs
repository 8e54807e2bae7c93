//! Integration tests for the `tracker` CLI binary.
//!
//! Argument parsing, help output, completions, and local validation run
//! without a server; a few end-to-end cases use a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tracker` binary with env isolation.
///
/// Clears all `TRACKER_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tracker_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tracker");
    cmd.env("HOME", "/tmp/tracker-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tracker-cli-test-nonexistent")
        .env_remove("TRACKER_PROFILE")
        .env_remove("TRACKER_API_URL")
        .env_remove("TRACKER_OUTPUT")
        .env_remove("TRACKER_INSECURE")
        .env_remove("TRACKER_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(args: Vec<String>) -> std::process::Output {
    run_blocking_in(None, args).await
}

async fn run_blocking_in(config_home: Option<PathBuf>, args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || {
        let mut cmd = tracker_cmd();
        if let Some(home) = config_home {
            cmd.env("HOME", &home).env("XDG_CONFIG_HOME", &home);
        }
        cmd.args(&args).output().unwrap()
    })
    .await
    .unwrap()
}

/// Write `contents` as the tracker config under a fresh config home.
fn config_home(contents: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("tracker");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
    dir
}

fn tracker_cmd_in(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = tracker_cmd();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path());
    cmd
}

fn issue_json(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "status": "open",
        "priority": "high",
        "assignee": "alice",
        "created_at": "2024-06-01T10:00:00",
        "updated_at": "2024-06-02T10:00:00"
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tracker_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tracker_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("issues")
            .and(predicate::str::contains("health"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    tracker_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tracker"));
}

#[test]
fn test_issues_subcommands_exist() {
    tracker_cmd().args(["issues", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("create"))
            .and(predicate::str::contains("update"))
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("browse")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    tracker_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    tracker_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Local validation (no server contacted) ──────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = tracker_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_get_non_numeric_id_is_usage_error() {
    tracker_cmd()
        .args(["issues", "get", "abc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid issue ID"));
}

#[test]
fn test_delete_non_numeric_id_is_usage_error() {
    tracker_cmd()
        .args(["issues", "delete", "abc", "--yes"])
        .assert()
        .code(2);
}

#[test]
fn test_update_without_fields_is_usage_error() {
    tracker_cmd()
        .args(["issues", "update", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn test_unknown_status_rejected_by_parser() {
    tracker_cmd()
        .args(["issues", "list", "--status", "blocked"])
        .assert()
        .code(2);
}

#[test]
fn test_page_zero_rejected_by_parser() {
    tracker_cmd()
        .args(["issues", "list", "--page", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_bad_api_url_is_usage_error() {
    tracker_cmd()
        .args(["--api-url", "ftp://example.com", "health"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    tracker_cmd()
        .args(["--profile", "nowhere", "health"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_browse_requires_terminal() {
    tracker_cmd()
        .args(["issues", "browse"])
        .write_stdin("")
        .assert()
        .code(2);
}

#[test]
fn test_config_path_prints_location() {
    tracker_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    tracker_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

// ── With a config file ──────────────────────────────────────────────

const TWO_PROFILES: &str = r#"
default_profile = "local"

[profiles.local]
api_url = "http://localhost:8000"

[profiles.staging]
api_url = "https://staging.example.com"
page_size = 25
"#;

#[test]
fn test_config_profiles_marks_default() {
    let home = config_home(TWO_PROFILES);
    tracker_cmd_in(&home)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("* local  http://localhost:8000")
                .and(predicate::str::contains("  staging  https://staging.example.com")),
        );
}

#[test]
fn test_config_use_rewrites_default_profile() {
    let home = config_home(TWO_PROFILES);
    tracker_cmd_in(&home)
        .args(["config", "use", "staging"])
        .assert()
        .success();

    let written = std::fs::read_to_string(home.path().join("tracker/config.toml")).unwrap();
    assert!(
        written.contains(r#"default_profile = "staging""#),
        "config not rewritten:\n{written}"
    );

    tracker_cmd_in(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page_size = 25"));
}

#[test]
fn test_config_use_unknown_profile_is_usage_error() {
    let home = config_home(TWO_PROFILES);
    tracker_cmd_in(&home)
        .args(["config", "use", "prod"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("prod"));
}

// ── Against a mock server ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param("skip", "5"))
        .and(query_param("limit", "5"))
        .and(query_param("status", "open"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([issue_json(11, "Eleven")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_blocking(vec![
        "--api-url".into(),
        server.uri(),
        "-o".into(),
        "json-compact".into(),
        "issues".into(),
        "list".into(),
        "--page".into(),
        "2".into(),
        "--page-size".into(),
        "5".into(),
        "--status".into(),
        "open".into(),
    ])
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["id"], 11);
    assert_eq!(listed[0]["priority"], "high");

    // --page is 1-based: page 2 of size 5 starts at row 5.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.query(),
        Some("skip=5&limit=5&status=open&sort_by=updated_at&sort_order=desc")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_missing_issue_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Issue not found" })))
        .mount(&server)
        .await;

    let output = run_blocking(vec![
        "--api-url".into(),
        server.uri(),
        "issues".into(),
        "get".into(),
        "42".into(),
    ])
    .await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_sends_only_changed_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(7, "Seven")))
        .mount(&server)
        .await;
    let mut closed = issue_json(7, "Seven");
    closed["status"] = json!("closed");
    Mock::given(method("PUT"))
        .and(path("/issues/7"))
        .and(body_json(json!({ "status": "closed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(closed))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_blocking(vec![
        "--api-url".into(),
        server.uri(),
        "-o".into(),
        "plain".into(),
        "issues".into(),
        "update".into(),
        "7".into(),
        "--status".into(),
        "closed".into(),
    ])
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "7");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_reports_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let output = run_blocking(vec![
        "--api-url".into(),
        server.uri(),
        "health".into(),
    ])
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Status:  ok"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_list_endpoint_is_api_error() {
    // Nothing mounted, so /issues answers 404 as a wrong base URL would.
    let server = MockServer::start().await;

    let output = run_blocking(vec![
        "--api-url".into(),
        server.uri(),
        "issues".into(),
        "list".into(),
    ])
    .await;

    let text = combined_output(&output);
    assert_eq!(output.status.code(), Some(1), "{text}");
    assert!(text.contains("/issues"), "{text}");
    assert!(!text.contains("resources list"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_from_config_file_selects_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let home = config_home(&format!(
        "[profiles.mock]\napi_url = \"{}\"\n",
        server.uri()
    ));
    let output = run_blocking_in(
        Some(home.path().to_path_buf()),
        vec!["--profile".into(), "mock".into(), "health".into()],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
}
