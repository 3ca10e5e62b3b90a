// crates/agent-toolkit-mcp/src/client.rs
// ============================================================================
// Module: HTTP Platform Client
// Description: reqwest-backed transport for platform API and docs search.
// Purpose: Authenticate, scope, identify, and bound every remote call.
// Dependencies: agent-toolkit-config, agent-toolkit-core, reqwest, url
// ============================================================================

//! ## Overview
//! [`HttpPlatformClient`] is the production [`PlatformClient`]. It sends
//! form-encoded API requests with bearer authentication, adds the connected
//! account header when a request is scoped, identifies itself according to
//! the session [`Mode`], disables redirects, and enforces a response size
//! limit. Remote error envelopes are decoded into [`PlatformError::Api`].
//! Security posture: the secret key is held privately and redacted from
//! `Debug` output; responses are untrusted and size-limited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use agent_toolkit_config::PlatformConfig;
use agent_toolkit_config::DEFAULT_API_BASE_URL;
use agent_toolkit_config::DEFAULT_DOCS_SEARCH_URL;
use agent_toolkit_core::Mode;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde_json::Value;
use serde_json::json;
use url::Url;
use url::form_urlencoded;

use crate::handle::PlatformClient;
use crate::handle::PlatformError;
use crate::handle::PlatformMethod;
use crate::handle::PlatformPayload;
use crate::handle::PlatformRequest;
use crate::handle::PlatformTarget;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Application name reported in toolkit mode.
pub const TOOLKIT_APP_NAME: &str = "agent-toolkit-rust";
/// Application name reported in protocol server mode.
pub const MCP_APP_NAME: &str = "agent-toolkit-mcp";
/// Application URL reported with client identification.
const APP_URL: &str = "https://github.com/stripe/agent-toolkit";
/// Header carrying the connected account scope.
const ACCOUNT_HEADER: &str = "Stripe-Account";
/// Header carrying structured client identification.
const CLIENT_INFO_HEADER: &str = "X-Stripe-Client-User-Agent";
/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default maximum response size in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Endpoint and limit settings for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    /// Base URL for API requests.
    pub api_base_url: Url,
    /// Documentation search endpoint.
    pub docs_search_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum response body size in bytes.
    pub max_response_bytes: usize,
}

impl PlatformSettings {
    /// Builds settings from validated platform configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidRequest`] when a URL fails to parse.
    pub fn from_config(config: &PlatformConfig) -> Result<Self, PlatformError> {
        Ok(Self {
            api_base_url: parse_url(&config.api_base_url)?,
            docs_search_url: parse_url(&config.docs_search_url)?,
            timeout: Duration::from_millis(config.timeout_ms),
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the default public endpoints and limits.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidRequest`] if a built-in URL fails to
    /// parse.
    pub fn public() -> Result<Self, PlatformError> {
        Ok(Self {
            api_base_url: parse_url(DEFAULT_API_BASE_URL)?,
            docs_search_url: parse_url(DEFAULT_DOCS_SEARCH_URL)?,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        })
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Secret key wrapper with redacted formatting.
struct SecretKey(String);

impl fmt::Debug for SecretKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("SecretKey(<redacted>)")
    }
}

/// reqwest-backed [`PlatformClient`].
#[derive(Debug)]
pub struct HttpPlatformClient {
    /// Underlying HTTP client.
    client: Client,
    /// Platform secret key.
    secret_key: SecretKey,
    /// Endpoint and limit settings.
    settings: PlatformSettings,
    /// Structured client identification header value.
    client_info: String,
}

impl HttpPlatformClient {
    /// Builds a client for the given credential, mode, and settings.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the credential is empty or the HTTP
    /// client cannot be constructed.
    pub fn new(
        secret_key: impl Into<String>,
        mode: Mode,
        settings: PlatformSettings,
    ) -> Result<Self, PlatformError> {
        let secret_key = secret_key.into();
        if secret_key.trim().is_empty() {
            return Err(PlatformError::InvalidRequest("secret key must be non-empty".to_string()));
        }
        let app_name = app_name(mode);
        let version = env!("CARGO_PKG_VERSION");
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(format!("{app_name}/{version} ({APP_URL})"))
            .redirect(Policy::none())
            .build()
            .map_err(|_| PlatformError::Transport("http client build failed".to_string()))?;
        let client_info = json!({
            "lang": "rust",
            "application": {
                "name": app_name,
                "version": version,
                "url": APP_URL
            }
        })
        .to_string();
        Ok(Self {
            client,
            secret_key: SecretKey(secret_key),
            settings,
            client_info,
        })
    }

    /// Resolves the request URL, including query parameters for reads.
    fn request_url(&self, request: &PlatformRequest) -> Result<Url, PlatformError> {
        let mut url = match request.target {
            PlatformTarget::Api => join_api_path(&self.settings.api_base_url, &request.path)?,
            PlatformTarget::DocumentationSearch => self.settings.docs_search_url.clone(),
        };
        if let (PlatformMethod::Get | PlatformMethod::Delete, PlatformPayload::Form(params)) =
            (request.method, &request.payload)
            && !params.is_empty()
        {
            url.query_pairs_mut().extend_pairs(params.pairs());
        }
        Ok(url)
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    async fn send(&self, request: PlatformRequest) -> Result<Value, PlatformError> {
        let url = self.request_url(&request)?;
        let mut builder = match request.method {
            PlatformMethod::Get => self.client.get(url),
            PlatformMethod::Post => self.client.post(url),
            PlatformMethod::Delete => self.client.delete(url),
        };
        builder = builder.header(CLIENT_INFO_HEADER, self.client_info.as_str());
        if request.target == PlatformTarget::Api {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", self.secret_key.0));
            if let Some(account) = &request.account {
                builder = builder.header(ACCOUNT_HEADER, account.as_str());
            }
        }
        match (request.method, &request.payload) {
            (PlatformMethod::Post, PlatformPayload::Form(params)) => {
                let body = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(params.pairs())
                    .finish();
                builder =
                    builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded").body(body);
            }
            (_, PlatformPayload::Json(body)) => {
                let bytes = serde_json::to_vec(body)
                    .map_err(|err| PlatformError::InvalidRequest(err.to_string()))?;
                builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
            }
            (PlatformMethod::Get | PlatformMethod::Delete, PlatformPayload::Form(_)) => {}
        }
        let response = builder
            .send()
            .await
            .map_err(|err| PlatformError::Transport(transport_label(&err).to_string()))?;
        let status = response.status().as_u16();
        let bytes = read_response_limited(response, self.settings.max_response_bytes).await?;
        decode_response(status, &bytes)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the application name reported for a mode.
#[must_use]
pub const fn app_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Toolkit => TOOLKIT_APP_NAME,
        Mode::ModelContextProtocol => MCP_APP_NAME,
    }
}

/// Parses an endpoint URL.
fn parse_url(value: &str) -> Result<Url, PlatformError> {
    Url::parse(value.trim())
        .map_err(|err| PlatformError::InvalidRequest(format!("invalid endpoint url: {err}")))
}

/// Appends an absolute API path to the base URL.
fn join_api_path(base: &Url, path: &str) -> Result<Url, PlatformError> {
    if !path.starts_with('/') || path.contains("..") || path.contains('?') {
        return Err(PlatformError::InvalidRequest(format!("invalid api path `{path}`")));
    }
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{path}"));
    Ok(url)
}

/// Classifies a reqwest error without leaking request details.
fn transport_label(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    }
}

/// Reads a response body while enforcing a size limit.
async fn read_response_limited(
    mut response: Response,
    max_bytes: usize,
) -> Result<Vec<u8>, PlatformError> {
    let max_bytes_u64 = u64::try_from(max_bytes).map_err(|_| PlatformError::ResponseTooLarge)?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(PlatformError::ResponseTooLarge);
    }
    let mut buf = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|_| PlatformError::Transport("failed to read response".to_string()))?
    {
        if buf.len() + chunk.len() > max_bytes {
            return Err(PlatformError::ResponseTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Decodes a response body, mapping error envelopes to [`PlatformError::Api`].
pub(crate) fn decode_response(status: u16, bytes: &[u8]) -> Result<Value, PlatformError> {
    let parsed: Result<Value, _> = serde_json::from_slice(bytes);
    if (200 .. 300).contains(&status) {
        return parsed.map_err(|err| PlatformError::Decode(err.to_string()));
    }
    let error = parsed.ok().and_then(|value| value.get("error").cloned());
    let message = error
        .as_ref()
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("platform request failed")
        .to_string();
    let code = error
        .as_ref()
        .and_then(|error| error.get("code").or_else(|| error.get("type")))
        .and_then(Value::as_str)
        .map(str::to_string);
    Err(PlatformError::Api {
        status,
        code,
        message,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only client helper assertions and debug rendering."
    )]

    use agent_toolkit_core::Mode;
    use url::Url;

    use super::HttpPlatformClient;
    use super::PlatformSettings;
    use super::decode_response;
    use super::join_api_path;
    use crate::handle::FormParams;
    use crate::handle::PlatformError;
    use crate::handle::PlatformMethod;
    use crate::handle::PlatformPayload;
    use crate::handle::PlatformRequest;
    use crate::handle::PlatformTarget;

    #[test]
    fn decode_response_maps_error_envelope() {
        let body = br#"{"error":{"type":"invalid_request_error","code":"resource_missing","message":"No such customer"}}"#;
        let err = decode_response(404, body).unwrap_err();
        assert_eq!(
            err,
            PlatformError::Api {
                status: 404,
                code: Some("resource_missing".to_string()),
                message: "No such customer".to_string(),
            }
        );
    }

    #[test]
    fn decode_response_handles_non_json_errors() {
        let err = decode_response(502, b"bad gateway").unwrap_err();
        assert!(matches!(err, PlatformError::Api { status: 502, code: None, .. }));
    }

    #[test]
    fn decode_response_rejects_invalid_success_body() {
        let err = decode_response(200, b"not json").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn join_api_path_preserves_base_prefix() {
        let base = Url::parse("http://127.0.0.1:9000/mock/").unwrap();
        let url = join_api_path(&base, "/v1/customers").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mock/v1/customers");
        assert!(join_api_path(&base, "v1/customers").is_err());
        assert!(join_api_path(&base, "/v1/../balance").is_err());
    }

    #[test]
    fn request_url_encodes_query_for_reads() {
        let client =
            HttpPlatformClient::new("sk_test_1", Mode::Toolkit, PlatformSettings::public().unwrap())
                .unwrap();
        let request = PlatformRequest {
            method: PlatformMethod::Get,
            target: PlatformTarget::Api,
            path: "/v1/customers".to_string(),
            payload: PlatformPayload::Form(
                FormParams::new().with("email", "a+b@example.com").with("limit", 3),
            ),
            account: None,
        };
        let url = client.request_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.stripe.com/v1/customers?email=a%2Bb%40example.com&limit=3"
        );
    }

    #[test]
    fn debug_output_redacts_secret_key() {
        let client = HttpPlatformClient::new(
            "sk_live_secret",
            Mode::ModelContextProtocol,
            PlatformSettings::public().unwrap(),
        )
        .unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk_live_secret"));
        assert!(client.client_info.contains("agent-toolkit-mcp"));
    }

    #[test]
    fn empty_secret_key_is_rejected() {
        let settings = PlatformSettings::public().unwrap();
        let result = HttpPlatformClient::new("  ", Mode::Toolkit, settings);
        assert!(result.is_err());
    }
}
