// crates/agent-toolkit-mcp/src/handle.rs
// ============================================================================
// Module: Capability Handle
// Description: Account-scoped access to the remote platform for handlers.
// Purpose: Route every remote call through one seam that applies scoping.
// Dependencies: agent-toolkit-core, async-trait, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Handlers never talk to the network directly. They receive a
//! [`CapabilityHandle`], whose request helpers stamp the session's connected
//! account onto every [`PlatformRequest`] before it reaches the
//! [`PlatformClient`]. The handle holds no credential; the secret key lives
//! only inside the concrete client.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use agent_toolkit_core::AccountId;
use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a resource identifier interpolated into a path.
const MAX_PATH_SEGMENT_LENGTH: usize = 255;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// HTTP method used for a platform request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformMethod {
    /// Read or list.
    Get,
    /// Create, update, or action.
    Post,
    /// Delete or cancel.
    Delete,
}

impl PlatformMethod {
    /// Returns the method label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Endpoint family addressed by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTarget {
    /// Authenticated REST API; `path` is appended to the API base URL.
    Api,
    /// Public documentation search endpoint; `path` is ignored.
    DocumentationSearch,
}

/// Ordered `key=value` parameters, using bracketed keys for nesting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    /// Appends a parameter when a value is present.
    #[must_use]
    pub fn with_opt<T: ToString>(self, key: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Returns the first value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    /// Returns the parameters in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Returns true when no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformPayload {
    /// Form parameters: query string for GET/DELETE, form body for POST.
    Form(FormParams),
    /// JSON request body.
    Json(Value),
}

/// A single remote call issued through a [`CapabilityHandle`].
///
/// # Invariants
/// - `account` always equals the issuing handle's account scope.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformRequest {
    /// HTTP method.
    pub method: PlatformMethod,
    /// Endpoint family.
    pub target: PlatformTarget,
    /// API path (for example `/v1/customers`).
    pub path: String,
    /// Request payload.
    pub payload: PlatformPayload,
    /// Connected account scope.
    pub account: Option<AccountId>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Remote platform errors surfaced to handlers and callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Network or client failure before a response was received.
    #[error("platform transport error: {0}")]
    Transport(String),
    /// The platform rejected the request.
    #[error("platform api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Platform error code when provided.
        code: Option<String>,
        /// Platform error message.
        message: String,
    },
    /// Response exceeded the configured size limit.
    #[error("platform response exceeds size limit")]
    ResponseTooLarge,
    /// Response body could not be decoded.
    #[error("platform response decode error: {0}")]
    Decode(String),
    /// Request could not be built from the handler input.
    #[error("invalid platform request: {0}")]
    InvalidRequest(String),
}

impl PlatformError {
    /// Returns a stable label for audit and telemetry.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Api {
                ..
            } => "api",
            Self::ResponseTooLarge => "response_too_large",
            Self::Decode(_) => "decode",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

// ============================================================================
// SECTION: Client Trait
// ============================================================================

/// Transport for platform requests.
///
/// Implementations own authentication. Test doubles implement this trait to
/// observe requests without network access.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Sends a request and returns the decoded JSON response.
    async fn send(&self, request: PlatformRequest) -> Result<Value, PlatformError>;
}

// ============================================================================
// SECTION: Capability Handle
// ============================================================================

/// Authenticated, account-scoped access object passed to every handler.
///
/// # Invariants
/// - Built once per session from the [`Context`] and shared read-only.
/// - Every request issued through the handle carries its account scope.
#[derive(Clone)]
pub struct CapabilityHandle {
    /// Authenticated platform transport.
    client: Arc<dyn PlatformClient>,
    /// Connected account scope from the context.
    account: Option<AccountId>,
}

impl CapabilityHandle {
    /// Builds a handle for the given context.
    #[must_use]
    pub fn new(client: Arc<dyn PlatformClient>, context: &Context) -> Self {
        Self {
            client,
            account: context.account().cloned(),
        }
    }

    /// Returns the connected account scope.
    #[must_use]
    pub const fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    /// Issues a scoped `GET` against the API.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the remote call fails.
    pub async fn get(&self, path: &str, params: FormParams) -> Result<Value, PlatformError> {
        self.send(PlatformMethod::Get, PlatformTarget::Api, path, PlatformPayload::Form(params))
            .await
    }

    /// Issues a scoped `POST` against the API.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the remote call fails.
    pub async fn post(&self, path: &str, params: FormParams) -> Result<Value, PlatformError> {
        self.send(PlatformMethod::Post, PlatformTarget::Api, path, PlatformPayload::Form(params))
            .await
    }

    /// Issues a scoped `DELETE` against the API.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the remote call fails.
    pub async fn delete(&self, path: &str, params: FormParams) -> Result<Value, PlatformError> {
        self.send(
            PlatformMethod::Delete,
            PlatformTarget::Api,
            path,
            PlatformPayload::Form(params),
        )
        .await
    }

    /// Queries the documentation search endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the remote call fails.
    pub async fn search_documentation(&self, body: Value) -> Result<Value, PlatformError> {
        self.send(
            PlatformMethod::Post,
            PlatformTarget::DocumentationSearch,
            "",
            PlatformPayload::Json(body),
        )
        .await
    }

    /// Stamps the account scope and forwards the request.
    async fn send(
        &self,
        method: PlatformMethod,
        target: PlatformTarget,
        path: &str,
        payload: PlatformPayload,
    ) -> Result<Value, PlatformError> {
        let request = PlatformRequest {
            method,
            target,
            path: path.to_string(),
            payload,
            account: self.account.clone(),
        };
        self.client.send(request).await
    }
}

impl fmt::Debug for CapabilityHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("CapabilityHandle").field("account", &self.account).finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a resource identifier before interpolating it into a path.
///
/// # Errors
///
/// Returns [`PlatformError::InvalidRequest`] for empty, oversized, or
/// non-identifier input.
pub fn path_segment(id: &str) -> Result<&str, PlatformError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_PATH_SEGMENT_LENGTH
        && id.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(id)
    } else {
        Err(PlatformError::InvalidRequest(format!("invalid resource identifier `{id}`")))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only request builder assertions."
    )]

    use super::FormParams;
    use super::path_segment;

    #[test]
    fn form_params_skip_absent_values() {
        let params = FormParams::new()
            .with("name", "Jenny")
            .with_opt::<String>("email", None)
            .with_opt("limit", Some(5));
        assert_eq!(params.pairs().len(), 2);
        assert_eq!(params.get("limit"), Some("5"));
        assert_eq!(params.get("email"), None);
    }

    #[test]
    fn path_segment_rejects_traversal() {
        assert!(path_segment("in_123").is_ok());
        assert!(path_segment("../balance").is_err());
        assert!(path_segment("in 1").is_err());
        assert!(path_segment("").is_err());
    }
}
