//! Section validation tests for agent-toolkit-config.
// crates/agent-toolkit-config/tests/config_validation.rs
// =============================================================================
// Module: Config Section Validation Tests
// Description: Validate toolkit, platform, server, and audit section rules.
// Purpose: Ensure invalid settings fail closed with actionable messages.
// =============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use agent_toolkit_config::ServerAuthMode;
use agent_toolkit_config::ToolkitConfig;

fn invalid(toml: &str) -> String {
    match ToolkitConfig::from_toml_str(toml) {
        Err(err) => err.to_string(),
        Ok(_) => format!("unexpectedly valid: {toml}"),
    }
}

#[test]
fn unknown_permission_resource_fails_closed() {
    let message = invalid("[toolkit]\npermissions = [\"customers:read\", \"widgets:read\"]\n");
    assert!(message.contains("toolkit.permissions"), "{message}");
    assert!(message.contains("widgets"), "{message}");
}

#[test]
fn empty_permission_list_is_restricted_not_unrestricted() {
    let config = ToolkitConfig::from_toml_str("[toolkit]\npermissions = []\n").unwrap();
    let context = config.context().unwrap();
    assert!(context.permissions().is_some_and(agent_toolkit_core::PermissionSet::is_empty));
}

#[test]
fn blank_account_is_rejected() {
    let message = invalid("[toolkit]\naccount = \"  \"\n");
    assert!(message.contains("toolkit.account"), "{message}");
}

#[test]
fn http_endpoints_require_opt_in() {
    let message = invalid("[platform]\napi_base_url = \"http://127.0.0.1:9000\"\n");
    assert!(message.contains("allow_http"), "{message}");
    let config = ToolkitConfig::from_toml_str(
        "[platform]\napi_base_url = \"http://127.0.0.1:9000\"\nallow_http = true\n",
    );
    assert!(config.is_ok());
}

#[test]
fn timeout_out_of_range_is_rejected() {
    let message = invalid("[platform]\ntimeout_ms = 10\n");
    assert!(message.contains("timeout_ms"), "{message}");
}

#[test]
fn http_transport_requires_bind() {
    let message = invalid("[server]\ntransport = \"http\"\n");
    assert!(message.contains("bind address"), "{message}");
}

#[test]
fn non_loopback_bind_requires_auth() {
    let message = invalid("[server]\ntransport = \"http\"\nbind = \"0.0.0.0:8080\"\n");
    assert!(message.contains("non-loopback"), "{message}");
    let config = ToolkitConfig::from_toml_str(
        "[server]\ntransport = \"http\"\nbind = \"0.0.0.0:8080\"\n[server.auth]\nmode = \
         \"bearer_token\"\nbearer_tokens = [\"token-1\"]\n",
    )
    .unwrap();
    assert_eq!(config.server.auth_mode(), ServerAuthMode::BearerToken);
}

#[test]
fn bearer_mode_requires_tokens() {
    let message = invalid(
        "[server]\ntransport = \"http\"\nbind = \"127.0.0.1:8080\"\n[server.auth]\nmode = \
         \"bearer_token\"\n",
    );
    assert!(message.contains("requires bearer_tokens"), "{message}");
}

#[test]
fn stdio_rejects_bearer_auth() {
    let message =
        invalid("[server.auth]\nmode = \"bearer_token\"\nbearer_tokens = [\"token-1\"]\n");
    assert!(message.contains("stdio transport"), "{message}");
}

#[test]
fn file_audit_sink_requires_path() {
    let message = invalid("[audit]\nsink = \"file\"\n");
    assert!(message.contains("audit.path"), "{message}");
}

#[test]
fn secret_key_resolves_from_configured_variable() {
    let config =
        ToolkitConfig::from_toml_str("[platform]\nsecret_key_env = \"MY_PLATFORM_KEY\"\n").unwrap();
    let key = config
        .platform
        .resolve_secret_key_with(|name| {
            (name == "MY_PLATFORM_KEY").then(|| "sk_test_1".to_string())
        })
        .unwrap();
    assert_eq!(key, "sk_test_1");
    let missing = config.platform.resolve_secret_key_with(|_| None).unwrap_err();
    assert!(missing.to_string().contains("MY_PLATFORM_KEY"));
}
