// crates/agent-toolkit-config/src/config.rs
// ============================================================================
// Module: Agent Toolkit Configuration
// Description: Configuration loading and validation for the Agent Toolkit.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: agent-toolkit-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed; unknown keys are rejected.
//! Security posture: config inputs are untrusted and the platform secret key is
//! resolved from the environment, never from the file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use agent_toolkit_core::AccountId;
use agent_toolkit_core::Context;
use agent_toolkit_core::Mode;
use agent_toolkit_core::PermissionSet;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "agent-toolkit.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "AGENT_TOOLKIT_CONFIG";
/// Default environment variable holding the platform secret key.
pub const DEFAULT_SECRET_KEY_ENV: &str = "AGENT_TOOLKIT_SECRET_KEY";
/// Default platform API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
/// Default documentation search endpoint.
pub const DEFAULT_DOCS_SEARCH_URL: &str = "https://ai.stripe.com/search";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of permission grants.
pub(crate) const MAX_PERMISSIONS: usize = 64;
/// Maximum number of server auth tokens.
pub(crate) const MAX_AUTH_TOKENS: usize = 64;
/// Maximum length of a server auth token.
pub(crate) const MAX_AUTH_TOKEN_LENGTH: usize = 256;
/// Maximum length of the secret key environment variable name.
pub(crate) const MAX_ENV_NAME_LENGTH: usize = 128;
/// Default platform request timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Minimum platform request timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum platform request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 120_000;
/// Default maximum platform response size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum allowed platform response size in bytes.
pub(crate) const MAX_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Default maximum inbound request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Agent Toolkit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolkitConfig {
    /// Session context configuration.
    #[serde(default)]
    pub toolkit: ToolkitSection,
    /// Remote platform client configuration.
    #[serde(default)]
    pub platform: PlatformConfig,
    /// MCP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ToolkitConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then `AGENT_TOOLKIT_CONFIG`, then
    /// `agent-toolkit.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Loads configuration, falling back to defaults when no file was named
    /// and the default file is absent.
    ///
    /// An explicit path or `AGENT_TOOLKIT_CONFIG` must point at a readable
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a named file fails to load or validate.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let named = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
        if !named && !Path::new(DEFAULT_CONFIG_NAME).exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.toolkit.validate()?;
        self.platform.validate()?;
        self.server.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Builds the immutable session context from the `[toolkit]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when permissions or the account are invalid.
    pub fn context(&self) -> Result<Context, ConfigError> {
        self.toolkit.context()
    }
}

/// Session context configuration (`[toolkit]`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolkitSection {
    /// Operating mode; affects client identification only.
    #[serde(default)]
    pub mode: Mode,
    /// Granted permissions as `resource:action` strings. Absent means
    /// unrestricted; an empty list exposes only ungated tools.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    /// Connected account used to scope every remote call.
    #[serde(default)]
    pub account: Option<String>,
}

impl ToolkitSection {
    /// Validates the section by building a context from it.
    fn validate(&self) -> Result<(), ConfigError> {
        self.context().map(|_| ())
    }

    /// Converts the section into a [`Context`].
    fn context(&self) -> Result<Context, ConfigError> {
        let permissions = match &self.permissions {
            None => None,
            Some(values) => {
                if values.len() > MAX_PERMISSIONS {
                    return Err(ConfigError::Invalid(
                        "toolkit.permissions has too many entries".to_string(),
                    ));
                }
                let set = PermissionSet::parse_all(values)
                    .map_err(|err| ConfigError::Invalid(format!("toolkit.permissions: {err}")))?;
                Some(set)
            }
        };
        let account = self
            .account
            .as_ref()
            .map(|account| AccountId::new(account.trim()))
            .transpose()
            .map_err(|err| ConfigError::Invalid(format!("toolkit.account: {err}")))?;
        Ok(Context::new(self.mode, permissions, account))
    }
}

/// Remote platform client configuration (`[platform]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Base URL for the platform REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Endpoint for documentation search.
    #[serde(default = "default_docs_search_url")]
    pub docs_search_url: String,
    /// Environment variable holding the secret key.
    #[serde(default = "default_secret_key_env")]
    pub secret_key_env: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Allow cleartext `http://` endpoints (local test doubles only).
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            docs_search_url: default_docs_search_url(),
            secret_key_env: default_secret_key_env(),
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            allow_http: false,
        }
    }
}

impl PlatformConfig {
    /// Validates platform endpoints and limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint("platform.api_base_url", &self.api_base_url, self.allow_http)?;
        validate_endpoint("platform.docs_search_url", &self.docs_search_url, self.allow_http)?;
        validate_env_name("platform.secret_key_env", &self.secret_key_env)?;
        if !(MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "platform.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(
                "platform.max_response_bytes out of range".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the secret key from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the variable is unset or empty.
    pub fn resolve_secret_key(&self) -> Result<String, ConfigError> {
        self.resolve_secret_key_with(|name| env::var(name).ok())
    }

    /// Resolves the secret key using a caller-provided variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the variable is unset or empty.
    pub fn resolve_secret_key_with<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup(&self.secret_key_env).unwrap_or_default();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "secret key not set; export {}",
                self.secret_key_env
            )));
        }
        Ok(trimmed.to_string())
    }
}

/// Server configuration for MCP transports (`[server]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Transport type for MCP.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Optional authentication configuration for inbound tool calls.
    #[serde(default)]
    pub auth: Option<ServerAuthConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: default_max_body_bytes(),
            auth: None,
        }
    }
}

impl ServerConfig {
    /// Validates server transport configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(auth) = &self.auth {
            auth.validate()?;
        }
        let auth_mode = self.auth_mode();
        match self.transport {
            ServerTransport::Http => {
                let bind = self.bind.as_deref().unwrap_or_default().trim();
                if bind.is_empty() {
                    return Err(ConfigError::Invalid(
                        "http transport requires bind address".to_string(),
                    ));
                }
                let addr: SocketAddr = bind
                    .parse()
                    .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))?;
                if !addr.ip().is_loopback() && auth_mode == ServerAuthMode::LocalOnly {
                    return Err(ConfigError::Invalid(
                        "non-loopback bind disallowed without auth policy".to_string(),
                    ));
                }
            }
            ServerTransport::Stdio => {
                if auth_mode != ServerAuthMode::LocalOnly {
                    return Err(ConfigError::Invalid(
                        "stdio transport only supports local_only auth".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns the effective inbound auth mode.
    #[must_use]
    pub fn auth_mode(&self) -> ServerAuthMode {
        self.auth.as_ref().map_or(ServerAuthMode::LocalOnly, |auth| auth.mode)
    }
}

/// Supported MCP transport types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// Use newline-delimited JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// Use HTTP JSON-RPC transport.
    Http,
}

impl ServerTransport {
    /// Returns a stable label for the transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

/// Inbound auth modes for MCP server tool calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerAuthMode {
    /// Local-only loopback or stdio access.
    #[default]
    LocalOnly,
    /// Bearer token authentication.
    BearerToken,
}

/// Server authentication configuration for inbound tool calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerAuthConfig {
    /// Auth mode for inbound MCP tool calls.
    #[serde(default)]
    pub mode: ServerAuthMode,
    /// Accepted bearer tokens (required for `bearer_token` mode).
    #[serde(default)]
    pub bearer_tokens: Vec<String>,
}

impl ServerAuthConfig {
    /// Validates auth configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bearer_tokens.len() > MAX_AUTH_TOKENS {
            return Err(ConfigError::Invalid("too many bearer tokens".to_string()));
        }
        for token in &self.bearer_tokens {
            if token.is_empty() || token.len() > MAX_AUTH_TOKEN_LENGTH {
                return Err(ConfigError::Invalid("bearer token length out of range".to_string()));
            }
            if token.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(
                    "bearer token must not contain whitespace".to_string(),
                ));
            }
        }
        match self.mode {
            ServerAuthMode::BearerToken if self.bearer_tokens.is_empty() => Err(
                ConfigError::Invalid("bearer_token mode requires bearer_tokens".to_string()),
            ),
            ServerAuthMode::LocalOnly if !self.bearer_tokens.is_empty() => Err(
                ConfigError::Invalid("bearer_tokens set without bearer_token mode".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Audit logging configuration (`[audit]`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Destination for audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines), required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path required for file sink".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path only applies to the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

/// Audit event destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default API base URL.
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Default documentation search URL.
fn default_docs_search_url() -> String {
    DEFAULT_DOCS_SEARCH_URL.to_string()
}

/// Default secret key environment variable.
fn default_secret_key_env() -> String {
    DEFAULT_SECRET_KEY_ENV.to_string()
}

/// Default request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default response size limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default inbound body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a remote endpoint URL.
fn validate_endpoint(field: &str, value: &str, allow_http: bool) -> Result<(), ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        "http" => {
            return Err(ConfigError::Invalid(format!("{field} uses http:// without allow_http")));
        }
        _ => return Err(ConfigError::Invalid(format!("{field} must use https://"))),
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid(format!("{field} must include a host")));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(format!("{field} must not embed credentials")));
    }
    Ok(())
}

/// Validates an environment variable name.
fn validate_env_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.len() > MAX_ENV_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} length out of range")));
    }
    let valid = value.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
        && !value.starts_with(|ch: char| ch.is_ascii_digit());
    if !valid {
        return Err(ConfigError::Invalid(format!("{field} must match [A-Z_][A-Z0-9_]*")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
