// crates/agent-toolkit-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: MCP server implementations for stdio and HTTP transports.
// Purpose: Expose the session's tools via JSON-RPC 2.0.
// Dependencies: agent-toolkit-config, axum, serde, tokio
// ============================================================================

//! ## Overview
//! The MCP server exposes a [`Toolkit`] session using JSON-RPC 2.0. It speaks
//! newline-delimited JSON over stdio or a single `/rpc` endpoint over HTTP,
//! and always routes calls through [`crate::tools::ToolRouter`]. Every
//! request is authorized before dispatch and each decision is audited.
//! Security posture: inputs are untrusted; request bodies are size-limited
//! before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;

use agent_toolkit_config::ServerAuthMode;
use agent_toolkit_config::ServerConfig;
use agent_toolkit_config::ServerTransport;
use agent_toolkit_config::ToolkitConfig;
use agent_toolkit_contract::ToolDefinition;
use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::auth::AuthAction;
use crate::auth::AuthAuditEvent;
use crate::auth::AuthError;
use crate::auth::DefaultToolAuthz;
use crate::auth::RequestContext;
use crate::auth::ToolAuthz;
use crate::session::Toolkit;
use crate::tools::ToolError;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON-RPC protocol version accepted and emitted.
const JSONRPC_VERSION: &str = "2.0";
/// MCP protocol version offered when the client requests an unknown one.
const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";
/// MCP protocol versions the server can speak.
const SUPPORTED_PROTOCOL_VERSIONS: &[&str] =
    &[LATEST_PROTOCOL_VERSION, "2025-03-26", "2024-11-05"];
/// Server name reported during initialization.
const SERVER_NAME: &str = "agent-toolkit";
/// Outbound stdio queue depth.
const STDIO_QUEUE_DEPTH: usize = 64;
/// Chunk size used while discarding an oversized stdio line.
const DRAIN_CHUNK_BYTES: u64 = 64 * 1024;

/// JSON-RPC error code for malformed requests.
const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC error code for unknown methods and tools.
const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC error code for invalid parameters.
const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC error code for internal failures.
const INTERNAL_ERROR: i64 = -32603;
/// Error code for unauthenticated callers.
const UNAUTHENTICATED: i64 = -32001;
/// Error code for unauthorized callers.
const UNAUTHORIZED: i64 = -32003;
/// Error code for oversized request bodies.
const REQUEST_TOO_LARGE: i64 = -32070;

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Transport to serve.
    transport: ServerTransport,
    /// Bind address for the HTTP transport.
    bind: Option<String>,
    /// Shared request handling state.
    state: Arc<ServerState>,
}

impl McpServer {
    /// Builds a new MCP server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when validation or session construction
    /// fails.
    pub fn from_config(config: &ToolkitConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let toolkit =
            Toolkit::from_config(config).map_err(|err| McpServerError::Init(err.to_string()))?;
        emit_local_only_warning(&config.server);
        Ok(Self::new(toolkit, &config.server))
    }

    /// Builds a server around an existing session.
    #[must_use]
    pub fn new(toolkit: Toolkit, server: &ServerConfig) -> Self {
        let authz = Arc::new(DefaultToolAuthz::from_config(server.auth.as_ref()));
        Self {
            transport: server.transport,
            bind: server.bind.clone(),
            state: Arc::new(ServerState {
                router: toolkit.router().clone(),
                authz,
                max_body_bytes: server.max_body_bytes,
            }),
        }
    }

    /// Handles one raw JSON-RPC payload and returns the response envelope.
    ///
    /// Returns `None` for notifications, which never receive a response.
    pub async fn respond(&self, context: &RequestContext, payload: &[u8]) -> Option<Value> {
        let (_, response) = parse_request(&self.state, context, payload).await?;
        serde_json::to_value(response).ok()
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        match self.transport {
            ServerTransport::Stdio => serve_stdio(self.state).await,
            ServerTransport::Http => serve_http(self.bind.as_deref(), self.state).await,
        }
    }
}

/// Shared server state for request handlers.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Inbound authorization policy.
    authz: Arc<dyn ToolAuthz>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// One newline-delimited frame read from stdin.
#[derive(Debug, PartialEq, Eq)]
enum StdioFrame {
    /// A complete line without its terminator.
    Line(Vec<u8>),
    /// A line exceeding the body limit; its bytes were discarded.
    TooLarge,
    /// End of input.
    Closed,
}

/// Serves JSON-RPC requests over stdin/stdout.
///
/// Requests are handled concurrently; a single writer task serializes
/// responses so lines never interleave.
async fn serve_stdio(state: Arc<ServerState>) -> Result<(), McpServerError> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(STDIO_QUEUE_DEPTH);
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(payload) = rx.recv().await {
            stdout.write_all(&payload).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });
    loop {
        let line = match read_frame(&mut reader, state.max_body_bytes).await? {
            StdioFrame::Closed => break,
            StdioFrame::TooLarge => {
                let (_, response) = too_large_response();
                if let Ok(payload) = serde_json::to_vec(&response) {
                    let _ = tx.send(payload).await;
                }
                continue;
            }
            StdioFrame::Line(line) => line,
        };
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let state = Arc::clone(&state);
        let tx = tx.clone();
        tokio::spawn(async move {
            let context = RequestContext::stdio();
            if let Some((_, response)) = parse_request(&state, &context, &line).await
                && let Ok(payload) = serde_json::to_vec(&response)
            {
                let _ = tx.send(payload).await;
            }
        });
    }
    drop(tx);
    writer
        .await
        .map_err(|_| McpServerError::Transport("stdio writer failed".to_string()))?
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

/// Reads one newline-delimited frame, bounded by `max_body_bytes`.
async fn read_frame<R>(reader: &mut R, max_body_bytes: usize) -> Result<StdioFrame, McpServerError>
where
    R: AsyncBufRead + Unpin,
{
    // Room for the payload plus a CRLF terminator.
    let limit = u64::try_from(max_body_bytes).unwrap_or(u64::MAX).saturating_add(2);
    let mut line = Vec::new();
    let read = (&mut *reader)
        .take(limit)
        .read_until(b'\n', &mut line)
        .await
        .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
    if read == 0 {
        return Ok(StdioFrame::Closed);
    }
    let terminated = line.last() == Some(&b'\n');
    if terminated {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    if line.len() > max_body_bytes {
        if !terminated {
            drain_line(reader).await?;
        }
        return Ok(StdioFrame::TooLarge);
    }
    Ok(StdioFrame::Line(line))
}

/// Discards input up to and including the next newline.
async fn drain_line<R>(reader: &mut R) -> Result<(), McpServerError>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let mut scratch = Vec::new();
        let read = (&mut *reader)
            .take(DRAIN_CHUNK_BYTES)
            .read_until(b'\n', &mut scratch)
            .await
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if read == 0 || scratch.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Serves JSON-RPC requests over HTTP.
async fn serve_http(bind: Option<&str>, state: Arc<ServerState>) -> Result<(), McpServerError> {
    let bind = bind.ok_or_else(|| McpServerError::Config("bind address required".to_string()))?;
    let addr: SocketAddr =
        bind.parse().map_err(|_| McpServerError::Config("invalid bind address".to_string()))?;
    let body_limit = state.max_body_bytes;
    let app = Router::new()
        .route("/rpc", post(handle_http))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

/// Handles HTTP JSON-RPC requests.
async fn handle_http(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    let context = http_request_context(peer, &headers);
    match parse_request(&state, &context, &bytes).await {
        Some((status, response)) => (status, axum::Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Builds the request context for an HTTP caller.
fn http_request_context(peer: SocketAddr, headers: &HeaderMap) -> RequestContext {
    let auth_header =
        headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(str::to_string);
    RequestContext::http(Some(peer.ip()), auth_header)
}

/// Warns when HTTP is served without explicit inbound auth.
fn emit_local_only_warning(server: &ServerConfig) {
    if server.transport == ServerTransport::Http && server.auth_mode() == ServerAuthMode::LocalOnly
    {
        let _ = writeln!(
            std::io::stderr(),
            "agent-toolkit-mcp: WARNING: http transport running in local-only mode; configure \
             server.auth to enable bearer_token"
        );
    }
}

// ============================================================================
// SECTION: JSON-RPC Types
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier; absent for notifications.
    #[serde(default)]
    id: Option<Value>,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    #[serde(default)]
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Parameters for `initialize`.
#[derive(Debug, Default, Deserialize)]
struct InitializeParams {
    /// Protocol version requested by the client.
    #[serde(default, rename = "protocolVersion")]
    protocol_version: Option<String>,
}

/// Result payload for `initialize`.
#[derive(Debug, Serialize)]
struct InitializeResult {
    /// Negotiated protocol version.
    #[serde(rename = "protocolVersion")]
    protocol_version: &'static str,
    /// Advertised server capabilities.
    capabilities: Value,
    /// Server identity.
    #[serde(rename = "serverInfo")]
    server_info: ServerInfo,
}

/// Server identity reported during initialization.
#[derive(Debug, Serialize)]
struct ServerInfo {
    /// Server name.
    name: &'static str,
    /// Server version.
    version: &'static str,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
    /// True when the tool ran but the platform call failed.
    #[serde(rename = "isError")]
    is_error: bool,
}

/// Tool output payloads for JSON-RPC responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// Serialized tool output.
    Text {
        /// Text payload.
        text: String,
    },
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Parses and validates a JSON-RPC request payload.
async fn parse_request(
    state: &ServerState,
    context: &RequestContext,
    bytes: &[u8],
) -> Option<(StatusCode, JsonRpcResponse)> {
    if bytes.len() > state.max_body_bytes {
        return Some(too_large_response());
    }
    match serde_json::from_slice::<JsonRpcRequest>(bytes) {
        Ok(request) => handle_request(state, context, request).await,
        Err(_) => Some(error_response(
            Value::Null,
            StatusCode::BAD_REQUEST,
            INVALID_REQUEST,
            "invalid json-rpc request".to_string(),
        )),
    }
}

/// Dispatches a JSON-RPC request.
///
/// Notifications run like requests, but their response is discarded.
async fn handle_request(
    state: &ServerState,
    base_context: &RequestContext,
    mut request: JsonRpcRequest,
) -> Option<(StatusCode, JsonRpcResponse)> {
    match request.id.take() {
        Some(id) => {
            let context = base_context.clone().with_request_id(id.to_string());
            Some(handle_call(state, &context, id, request).await)
        }
        None => {
            let _ = handle_call(state, base_context, Value::Null, request).await;
            None
        }
    }
}

/// Validates the envelope and routes the method.
async fn handle_call(
    state: &ServerState,
    context: &RequestContext,
    id: Value,
    request: JsonRpcRequest,
) -> (StatusCode, JsonRpcResponse) {
    if request.jsonrpc != JSONRPC_VERSION {
        return error_response(
            id,
            StatusCode::BAD_REQUEST,
            INVALID_REQUEST,
            "invalid json-rpc version".to_string(),
        );
    }
    match request.method.as_str() {
        "initialize" => match authorize(state, context, AuthAction::Session) {
            Ok(()) => initialize(id, request.params),
            Err(err) => auth_error(id, &err),
        },
        "ping" => match authorize(state, context, AuthAction::Session) {
            Ok(()) => success(id, &serde_json::json!({})),
            Err(err) => auth_error(id, &err),
        },
        "tools/list" => match authorize(state, context, AuthAction::ListTools) {
            Ok(()) => success(
                id,
                &ToolListResult {
                    tools: state.router.list_tools(),
                },
            ),
            Err(err) => auth_error(id, &err),
        },
        "tools/call" => call_tool(state, context, id, request.params).await,
        _ => error_response(
            id,
            StatusCode::BAD_REQUEST,
            METHOD_NOT_FOUND,
            "method not found".to_string(),
        ),
    }
}

/// Answers `initialize` with the negotiated protocol version.
fn initialize(id: Value, params: Option<Value>) -> (StatusCode, JsonRpcResponse) {
    let params: InitializeParams =
        params.and_then(|value| serde_json::from_value(value).ok()).unwrap_or_default();
    let protocol_version = params
        .protocol_version
        .as_deref()
        .and_then(|requested| {
            SUPPORTED_PROTOCOL_VERSIONS.iter().copied().find(|version| *version == requested)
        })
        .unwrap_or(LATEST_PROTOCOL_VERSION);
    success(
        id,
        &InitializeResult {
            protocol_version,
            capabilities: serde_json::json!({ "tools": {} }),
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: env!("CARGO_PKG_VERSION"),
            },
        },
    )
}

/// Authorizes and dispatches a `tools/call` request.
async fn call_tool(
    state: &ServerState,
    context: &RequestContext,
    id: Value,
    params: Option<Value>,
) -> (StatusCode, JsonRpcResponse) {
    let Ok(call) = serde_json::from_value::<ToolCallParams>(params.unwrap_or(Value::Null)) else {
        return error_response(
            id,
            StatusCode::BAD_REQUEST,
            INVALID_PARAMS,
            "invalid tool params".to_string(),
        );
    };
    if let Err(err) = authorize(state, context, AuthAction::CallTool(&call.name)) {
        return auth_error(id, &err);
    }
    let (text, is_error) = match state.router.call(&call.name, call.arguments).await {
        Ok(text) => (text, false),
        Err(err @ ToolError::CapabilityExecution {
            ..
        }) => (err.to_string(), true),
        Err(err) => return jsonrpc_error(id, err),
    };
    success(
        id,
        &ToolCallResult {
            content: vec![ToolContent::Text {
                text,
            }],
            is_error,
        },
    )
}

/// Runs the authorization policy and audits the decision.
fn authorize(
    state: &ServerState,
    context: &RequestContext,
    action: AuthAction<'_>,
) -> Result<(), AuthError> {
    let audit = state.router.audit();
    match state.authz.authorize(context, action) {
        Ok(auth) => {
            audit.record_authz(&AuthAuditEvent::allowed(context, action, &auth));
            Ok(())
        }
        Err(err) => {
            audit.record_authz(&AuthAuditEvent::denied(context, action, &err));
            Err(err)
        }
    }
}

/// Builds a successful JSON-RPC response.
fn success<T: Serialize>(id: Value, payload: &T) -> (StatusCode, JsonRpcResponse) {
    match serde_json::to_value(payload) {
        Ok(value) => (
            StatusCode::OK,
            JsonRpcResponse {
                jsonrpc: JSONRPC_VERSION,
                id,
                result: Some(value),
                error: None,
            },
        ),
        Err(_) => jsonrpc_error(id, ToolError::Serialization),
    }
}

/// Builds a JSON-RPC error response.
fn error_response(
    id: Value,
    status: StatusCode,
    code: i64,
    message: String,
) -> (StatusCode, JsonRpcResponse) {
    (
        status,
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
            }),
        },
    )
}

/// Builds the response for an oversized request body.
fn too_large_response() -> (StatusCode, JsonRpcResponse) {
    error_response(
        Value::Null,
        StatusCode::PAYLOAD_TOO_LARGE,
        REQUEST_TOO_LARGE,
        "request body too large".to_string(),
    )
}

/// Builds a JSON-RPC error response for an auth failure.
fn auth_error(id: Value, error: &AuthError) -> (StatusCode, JsonRpcResponse) {
    match error {
        AuthError::Unauthenticated(_) => error_response(
            id,
            StatusCode::UNAUTHORIZED,
            UNAUTHENTICATED,
            "unauthenticated".to_string(),
        ),
        AuthError::Unauthorized(_) => {
            error_response(id, StatusCode::FORBIDDEN, UNAUTHORIZED, "unauthorized".to_string())
        }
    }
}

/// Builds a JSON-RPC error response for a tool failure.
fn jsonrpc_error(id: Value, error: ToolError) -> (StatusCode, JsonRpcResponse) {
    let message = error.to_string();
    let (status, code) = match error {
        ToolError::UnknownCapability(_) => (StatusCode::BAD_REQUEST, METHOD_NOT_FOUND),
        ToolError::InvalidArguments {
            ..
        } => (StatusCode::BAD_REQUEST, INVALID_PARAMS),
        ToolError::CapabilityExecution {
            ..
        }
        | ToolError::Serialization => (StatusCode::OK, INTERNAL_ERROR),
    };
    error_response(id, status, code, message)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
