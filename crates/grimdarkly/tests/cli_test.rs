//! Integration tests for the `grimdarkly` CLI binary.
//!
//! Argument parsing, help output and completions run offline; search and
//! lookup commands run against a wiremock catalog.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `grimdarkly` binary with env isolation.
///
/// Clears all `GRIMDARKLY_*` env vars and points config and data
/// directories at `home` so tests never touch the user's real files.
fn grimdarkly_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("grimdarkly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("GRIMDARKLY_API_URL")
        .env_remove("GRIMDARKLY_OUTPUT")
        .env_remove("GRIMDARKLY_COLOR")
        .env_remove("GRIMDARKLY_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so wiremock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn unit_json(id: u32, name: &str, toughness: i32) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "movement": 6,
        "toughness": toughness,
        "save": 3,
        "wounds": 3,
        "leadership": 6,
        "oc": 1,
        "unitType": "OTHER",
        "faction": { "id": 4, "name": "World Eaters", "category": { "id": 1, "name": "Chaos" } },
        "weapons": [
            { "id": 1, "name": "Bolt pistol" },
            { "id": 2, "name": "Chainblade" },
            { "id": 3, "name": "Plasma pistol" },
            { "id": 4, "name": "Power fist" }
        ],
        "keywords": ["Infantry", "Berzerker"]
    })
}

fn search_ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": data,
        "meta": { "searchParams": {}, "nameTerms": [], "count": 0 }
    }))
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = grimdarkly_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    grimdarkly_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("factions")
                .and(predicate::str::contains("units"))
                .and(predicate::str::contains("weapons")),
        );
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    grimdarkly_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    grimdarkly_cmd(home.path())
        .args(["config", "set", "api_url", "http://catalog.local:3000/api"])
        .assert()
        .success();
    grimdarkly_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://catalog.local:3000/api"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let output = grimdarkly_cmd(home.path())
        .args(["config", "set", "profile", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown config key"));
}

#[test]
fn test_prefs_variants_persist() {
    let home = tempfile::tempdir().unwrap();
    grimdarkly_cmd(home.path())
        .args(["prefs", "variants", "off"])
        .assert()
        .success()
        .stderr(predicate::str::contains("hidden"));
    grimdarkly_cmd(home.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grimdarkly.showVariants = false"));
}

// ── Search ──────────────────────────────────────────────────────────

#[test]
fn test_search_without_filters_hints() {
    let home = tempfile::tempdir().unwrap();
    grimdarkly_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api", "units", "search"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No filters set"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_units_search_sorted_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/units/search"))
        .and(query_param("keyword", "berzerker"))
        .and(query_param("faction", "World Eaters"))
        .respond_with(search_ok(json!([
            unit_json(1, "Khorne Berzerkers", 4),
            unit_json(2, "Eightbound", 6)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = grimdarkly_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/api", server.uri()),
        "-o",
        "plain",
        "units",
        "search",
        "--faction",
        "World Eaters",
        "-k",
        "berzerker",
        "--sort",
        "toughness",
        "--desc",
        "--share",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Eightbound\nKhorne Berzerkers");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Found 2 units"));
    assert!(stderr.contains("Share: ?faction=World+Eaters&keyword=berzerker"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_query_link_with_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weapons/search"))
        .and(query_param("ap", "-2"))
        .respond_with(search_ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = grimdarkly_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/api", server.uri()),
        "weapons",
        "search",
        "--query",
        "?ap=-2&color=red",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No weapons found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_failure_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/units/search"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "database offline"
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = grimdarkly_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/api", server.uri()),
        "units",
        "search",
        "--name",
        "boyz",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Failed to search units. Please try again."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unit_get_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/units/name/Ghost%20Squad"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Unit not found"
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = grimdarkly_cmd(home.path());
    cmd.args([
        "--api-url",
        &format!("{}/api", server.uri()),
        "units",
        "get",
        "Ghost Squad",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_factions_list_respects_no_variants() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/factions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 2, "name": "Orks", "category": { "id": 3, "name": "Xenos" } },
                { "id": 1, "name": "Space Marines", "category": { "id": 1, "name": "Imperium" } }
            ]
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let api = format!("{}/api", server.uri());

    let mut cmd = grimdarkly_cmd(home.path());
    cmd.args(["--api-url", &api, "-o", "plain", "factions", "list"]);
    let output = run(cmd).await;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(stdout.contains("Ultramarines"));
    assert_eq!(stdout.lines().count(), 11);

    let mut cmd = grimdarkly_cmd(home.path());
    cmd.args(["--api-url", &api, "-o", "plain", "factions", "list", "--no-variants"]);
    let output = run(cmd).await;
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Orks\nSpace Marines"
    );
}
