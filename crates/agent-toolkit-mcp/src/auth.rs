// crates/agent-toolkit-mcp/src/auth.rs
// ============================================================================
// Module: Server Authn/Authz
// Description: Inbound authentication for the protocol server.
// Purpose: Provide strict, fail-closed auth policies for server requests.
// Dependencies: agent-toolkit-config, serde, sha2, thiserror
// ============================================================================

//! ## Overview
//! Inbound requests are authorized before they reach the tool router. Stdio
//! callers are always local. HTTP callers must either connect from loopback
//! (`local_only`) or present an allow-listed bearer token (`bearer_token`).
//! Every decision produces an [`AuthAuditEvent`]; bearer tokens appear in
//! audit only as SHA-256 fingerprints.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::net::IpAddr;

use agent_toolkit_config::ServerAuthConfig;
use agent_toolkit_config::ServerAuthMode;
use agent_toolkit_config::ServerTransport;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted authorization header size.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request context used for auth decisions.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Transport used by the caller.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<IpAddr>,
    /// Authorization header value (HTTP).
    pub auth_header: Option<String>,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a stdio request context.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            peer_ip: None,
            auth_header: None,
            request_id: None,
        }
    }

    /// Builds an HTTP request context.
    #[must_use]
    pub const fn http(peer_ip: Option<IpAddr>, auth_header: Option<String>) -> Self {
        Self {
            transport: ServerTransport::Http,
            peer_ip,
            auth_header,
            request_id: None,
        }
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns true when the peer IP is loopback.
    #[must_use]
    pub fn peer_is_loopback(&self) -> bool {
        self.peer_ip.is_some_and(|ip| ip.is_loopback())
    }
}

// ============================================================================
// SECTION: Auth Context
// ============================================================================

/// Authenticated caller context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authentication method.
    pub method: AuthMethod,
    /// Optional subject identifier.
    pub subject: Option<String>,
    /// Token fingerprint for bearer auth (sha256 hex).
    pub token_fingerprint: Option<String>,
}

/// Authentication method used for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Local-only loopback or stdio access.
    Local,
    /// Bearer token authentication.
    BearerToken,
}

impl AuthMethod {
    /// Returns a stable label for the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::BearerToken => "bearer_token",
        }
    }
}

/// Server action being authorized.
#[derive(Debug, Clone, Copy)]
pub enum AuthAction<'a> {
    /// Session setup (`initialize`, `ping`).
    Session,
    /// List tools action.
    ListTools,
    /// Tool call action with the requested name.
    CallTool(&'a str),
}

impl AuthAction<'_> {
    /// Returns the audit label for the action.
    fn label(self) -> String {
        match self {
            AuthAction::Session => "session".to_string(),
            AuthAction::ListTools => "tools/list".to_string(),
            AuthAction::CallTool(tool) => tool.chars().take(64).collect(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authentication or authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Missing or invalid authentication.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Caller is authenticated but not authorized.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Authn/authz interface for server requests.
pub trait ToolAuthz: Send + Sync {
    /// Authorize a request. Returns an authenticated context on success.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the caller is not allowed.
    fn authorize(
        &self,
        ctx: &RequestContext,
        action: AuthAction<'_>,
    ) -> Result<AuthContext, AuthError>;
}

// ============================================================================
// SECTION: Default Policy
// ============================================================================

/// Default authz implementation derived from server config.
pub struct DefaultToolAuthz {
    /// Configured auth mode.
    mode: ServerAuthMode,
    /// Accepted bearer tokens.
    bearer_tokens: BTreeSet<String>,
}

impl DefaultToolAuthz {
    /// Builds a default authz policy from server auth configuration.
    #[must_use]
    pub fn from_config(config: Option<&ServerAuthConfig>) -> Self {
        let mode = config.map_or(ServerAuthMode::LocalOnly, |cfg| cfg.mode);
        let bearer_tokens =
            config.map(|cfg| cfg.bearer_tokens.iter().cloned().collect()).unwrap_or_default();
        Self {
            mode,
            bearer_tokens,
        }
    }

    /// Returns the configured auth mode.
    #[must_use]
    pub const fn mode(&self) -> ServerAuthMode {
        self.mode
    }
}

impl ToolAuthz for DefaultToolAuthz {
    fn authorize(
        &self,
        ctx: &RequestContext,
        _action: AuthAction<'_>,
    ) -> Result<AuthContext, AuthError> {
        match self.mode {
            ServerAuthMode::LocalOnly => authorize_local_only(ctx),
            ServerAuthMode::BearerToken => authorize_bearer(ctx, &self.bearer_tokens),
        }
    }
}

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Auth audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    event: &'static str,
    /// Decision outcome.
    decision: &'static str,
    /// Server action name.
    action: String,
    /// Transport label.
    transport: &'static str,
    /// Caller IP address (if available).
    peer_ip: Option<String>,
    /// Auth method label.
    auth_method: Option<&'static str>,
    /// Caller subject or identity label.
    subject: Option<String>,
    /// Bearer token fingerprint (sha256).
    token_fingerprint: Option<String>,
    /// Failure reason (for deny events).
    reason: Option<String>,
    /// Request identifier (if provided).
    request_id: Option<String>,
}

impl AuthAuditEvent {
    /// Builds an allow event.
    #[must_use]
    pub fn allowed(ctx: &RequestContext, action: AuthAction<'_>, auth: &AuthContext) -> Self {
        Self {
            event: "server_authz",
            decision: "allow",
            action: action.label(),
            transport: ctx.transport.as_str(),
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            auth_method: Some(auth.method.as_str()),
            subject: auth.subject.clone(),
            token_fingerprint: auth.token_fingerprint.clone(),
            reason: None,
            request_id: ctx.request_id.clone(),
        }
    }

    /// Builds a deny event.
    #[must_use]
    pub fn denied(ctx: &RequestContext, action: AuthAction<'_>, error: &AuthError) -> Self {
        Self {
            event: "server_authz",
            decision: "deny",
            action: action.label(),
            transport: ctx.transport.as_str(),
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            auth_method: None,
            subject: None,
            token_fingerprint: None,
            reason: Some(error.to_string()),
            request_id: ctx.request_id.clone(),
        }
    }

    /// Returns the decision label.
    #[must_use]
    pub const fn decision(&self) -> &'static str {
        self.decision
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Authorizes stdio callers and loopback HTTP peers.
fn authorize_local_only(ctx: &RequestContext) -> Result<AuthContext, AuthError> {
    match ctx.transport {
        ServerTransport::Stdio => Ok(AuthContext {
            method: AuthMethod::Local,
            subject: Some("stdio".to_string()),
            token_fingerprint: None,
        }),
        ServerTransport::Http => {
            if ctx.peer_is_loopback() {
                Ok(AuthContext {
                    method: AuthMethod::Local,
                    subject: Some("loopback".to_string()),
                    token_fingerprint: None,
                })
            } else {
                Err(AuthError::Unauthenticated(
                    "local-only mode requires loopback access".to_string(),
                ))
            }
        }
    }
}

/// Authorizes callers presenting an allow-listed bearer token.
fn authorize_bearer(
    ctx: &RequestContext,
    tokens: &BTreeSet<String>,
) -> Result<AuthContext, AuthError> {
    let token = parse_bearer_token(ctx.auth_header.as_deref())?;
    if !tokens.contains(token) {
        return Err(AuthError::Unauthenticated("invalid bearer token".to_string()));
    }
    Ok(AuthContext {
        method: AuthMethod::BearerToken,
        subject: None,
        token_fingerprint: Some(fingerprint(token)),
    })
}

/// Extracts the token from a `Bearer` authorization header.
fn parse_bearer_token(auth_header: Option<&str>) -> Result<&str, AuthError> {
    let header = auth_header
        .ok_or_else(|| AuthError::Unauthenticated("missing authorization".to_string()))?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(AuthError::Unauthenticated("authorization header too large".to_string()));
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::Unauthenticated("invalid authorization header".to_string()));
    }
    Ok(token)
}

/// Returns the lowercase hex SHA-256 digest of a token.
fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only auth policy assertions."
    )]

    use std::net::IpAddr;
    use std::net::Ipv4Addr;

    use agent_toolkit_config::ServerAuthConfig;
    use agent_toolkit_config::ServerAuthMode;

    use super::AuthAction;
    use super::AuthAuditEvent;
    use super::AuthError;
    use super::AuthMethod;
    use super::DefaultToolAuthz;
    use super::RequestContext;
    use super::ToolAuthz;

    fn bearer_policy() -> DefaultToolAuthz {
        DefaultToolAuthz::from_config(Some(&ServerAuthConfig {
            mode: ServerAuthMode::BearerToken,
            bearer_tokens: vec!["token-1".to_string()],
        }))
    }

    #[test]
    fn local_only_allows_stdio_and_loopback() {
        let policy = DefaultToolAuthz::from_config(None);
        let stdio = policy.authorize(&RequestContext::stdio(), AuthAction::ListTools).unwrap();
        assert_eq!(stdio.method, AuthMethod::Local);
        let loopback = RequestContext::http(Some(IpAddr::V4(Ipv4Addr::LOCALHOST)), None);
        assert!(policy.authorize(&loopback, AuthAction::Session).is_ok());
    }

    #[test]
    fn local_only_rejects_remote_peers() {
        let policy = DefaultToolAuthz::from_config(None);
        let remote = RequestContext::http(Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8))), None);
        let err = policy.authorize(&remote, AuthAction::CallTool("list_customers")).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[test]
    fn bearer_tokens_are_fingerprinted() {
        let ctx = RequestContext::http(None, Some("Bearer token-1".to_string()));
        let auth = bearer_policy().authorize(&ctx, AuthAction::ListTools).unwrap();
        let fingerprint = auth.token_fingerprint.clone().unwrap();
        assert_eq!(fingerprint.len(), 64);
        assert!(!fingerprint.contains("token-1"));
        let event = AuthAuditEvent::allowed(&ctx, AuthAction::ListTools, &auth);
        let payload = serde_json::to_string(&event).unwrap();
        assert!(!payload.contains("token-1"));
        assert_eq!(event.decision(), "allow");
    }

    #[test]
    fn bearer_rejects_missing_or_unknown_tokens() {
        let policy = bearer_policy();
        let missing = RequestContext::http(None, None);
        assert!(policy.authorize(&missing, AuthAction::ListTools).is_err());
        let wrong = RequestContext::http(None, Some("Bearer token-2".to_string()));
        assert!(policy.authorize(&wrong, AuthAction::ListTools).is_err());
        let scheme = RequestContext::http(None, Some("Basic token-1".to_string()));
        assert!(policy.authorize(&scheme, AuthAction::ListTools).is_err());
    }
}
