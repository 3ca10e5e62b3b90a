// crates/agent-toolkit-cli/tests/cli.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Runs the `agent-toolkit` binary against temporary configs.
// Purpose: Verify listing, validation, and call failures end to end.
// Dependencies: agent-toolkit-cli binary, serde_json
// ============================================================================

//! ## Overview
//! Exercises the compiled binary. None of these tests reach the network:
//! they either list tools, fail before a client is built, or call a tool the
//! context filters out.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde_json::Value;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Secret key variable name used by test configs.
const TEST_KEY_ENV: &str = "AGENT_TOOLKIT_CLI_TEST_KEY";

fn toolkit_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_agent-toolkit"))
}

fn temp_root(label: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock drift").as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("agent-toolkit-cli-{label}-{nanos}"));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn cleanup(path: &PathBuf) {
    let _ = fs::remove_dir_all(path);
}

fn write_config(root: &PathBuf, contents: &str) -> PathBuf {
    let path = root.join("agent-toolkit.toml");
    fs::write(&path, contents.trim()).expect("write config");
    path
}

fn run(args: &[&str], secret: Option<&str>) -> Output {
    let mut command = Command::new(toolkit_bin());
    command.args(args).env_remove(TEST_KEY_ENV).env_remove("AGENT_TOOLKIT_CONFIG");
    if let Some(secret) = secret {
        command.env(TEST_KEY_ENV, secret);
    }
    command.output().expect("run agent-toolkit")
}

fn restricted_config() -> String {
    format!(
        r#"
[toolkit]
permissions = ["customers:read"]

[platform]
secret_key_env = "{TEST_KEY_ENV}"
"#
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn version_flag_prints_version() {
    let output = run(&["--version"], None);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("agent-toolkit "), "unexpected stdout: {stdout}");
}

#[test]
fn tools_list_json_respects_permissions_without_secret() {
    let root = temp_root("list");
    let config_path = write_config(&root, &restricted_config());

    let path = config_path.to_string_lossy();
    let output = run(&["tools", "list", "--config", path.as_ref(), "--format", "json"], None);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let listing: Value = serde_json::from_slice(&output.stdout).expect("json listing");
    let names: Vec<&str> = listing
        .as_array()
        .expect("array")
        .iter()
        .map(|tool| tool["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["list_customers", "search_documentation"]);

    cleanup(&root);
}

#[test]
fn config_validate_reports_invalid_permissions() {
    let root = temp_root("validate");
    let config_path = write_config(&root, "[toolkit]\npermissions = [\"widgets:read\"]\n");

    let path = config_path.to_string_lossy();
    let output = run(&["config", "validate", "--config", path.as_ref()], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("toolkit.permissions"), "unexpected stderr: {stderr}");

    cleanup(&root);
}

#[test]
fn config_validate_accepts_valid_file() {
    let root = temp_root("validate-ok");
    let config_path = write_config(&root, &restricted_config());

    let path = config_path.to_string_lossy();
    let output = run(&["config", "validate", "--config", path.as_ref()], None);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "config ok");

    cleanup(&root);
}

#[test]
fn tools_call_requires_secret_key() {
    let root = temp_root("no-secret");
    let config_path = write_config(&root, &restricted_config());

    let path = config_path.to_string_lossy();
    let output =
        run(&["tools", "call", "--config", path.as_ref(), "--name", "list_customers"], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(TEST_KEY_ENV), "unexpected stderr: {stderr}");

    cleanup(&root);
}

#[test]
fn tools_call_rejects_filtered_tool() {
    let root = temp_root("filtered");
    let config_path = write_config(&root, &restricted_config());

    let path = config_path.to_string_lossy();
    let output = run(
        &["tools", "call", "--config", path.as_ref(), "--name", "create_product"],
        Some("sk_test_cli"),
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown capability: create_product"), "unexpected stderr: {stderr}");

    cleanup(&root);
}

#[test]
fn meter_record_rejects_blank_customer_before_sending() {
    let root = temp_root("meter");
    let config_path = write_config(&root, &restricted_config());

    let path = config_path.to_string_lossy();
    let output = run(
        &[
            "meter",
            "record",
            "--config",
            path.as_ref(),
            "--event",
            "api_calls",
            "--customer",
            " ",
            "--value",
            "3",
        ],
        Some("sk_test_cli"),
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("meter customer must be non-empty"), "unexpected stderr: {stderr}");

    cleanup(&root);
}
