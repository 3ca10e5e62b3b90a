// crates/agent-toolkit-mcp/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared test doubles and fixtures for toolkit tests.
// Purpose: Observe platform requests without network access.
// Dependencies: agent-toolkit-core, agent-toolkit-mcp
// ============================================================================

//! ## Overview
//! Provides a recording [`PlatformClient`], stub capability handlers, and
//! context builders shared by the integration tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test fixtures use unwraps for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use agent_toolkit_core::AccountId;
use agent_toolkit_core::Context;
use agent_toolkit_core::Mode;
use agent_toolkit_core::Permission;
use agent_toolkit_core::PermissionSet;
use agent_toolkit_core::ToolName;
use agent_toolkit_mcp::CapabilityDescriptor;
use agent_toolkit_mcp::CapabilityHandle;
use agent_toolkit_mcp::CapabilityHandler;
use agent_toolkit_mcp::PlatformClient;
use agent_toolkit_mcp::PlatformError;
use agent_toolkit_mcp::PlatformRequest;
use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Recording Client
// ============================================================================

/// Platform client that records every request and replies with a canned
/// value or error.
pub struct RecordingClient {
    /// Requests in arrival order.
    requests: Mutex<Vec<PlatformRequest>>,
    /// Canned reply.
    reply: Result<Value, PlatformError>,
}

impl RecordingClient {
    /// Creates a client that answers every request with `value`.
    pub fn replying(value: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Ok(value),
        })
    }

    /// Creates a client that fails every request with `error`.
    pub fn failing(error: PlatformError) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Err(error),
        })
    }

    /// Returns the recorded requests.
    pub fn requests(&self) -> Vec<PlatformRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the single recorded request.
    pub fn only_request(&self) -> PlatformRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one platform request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl PlatformClient for RecordingClient {
    async fn send(&self, request: PlatformRequest) -> Result<Value, PlatformError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone()
    }
}

// ============================================================================
// SECTION: Stub Handlers
// ============================================================================

/// Handler that returns a fixed value and counts invocations.
#[derive(Default)]
pub struct StubHandler {
    /// Invocation count.
    pub calls: AtomicUsize,
    /// Value returned on success.
    pub output: Value,
}

impl StubHandler {
    /// Creates a stub returning `output`.
    pub fn returning(output: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            output,
        })
    }

    /// Returns how many times the stub ran.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityHandler for StubHandler {
    async fn execute(
        &self,
        _handle: &CapabilityHandle,
        _context: &Context,
        _args: Value,
    ) -> Result<Value, PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Handler that always fails with a remote rejection.
pub struct FailingHandler;

#[async_trait]
impl CapabilityHandler for FailingHandler {
    async fn execute(
        &self,
        _handle: &CapabilityHandle,
        _context: &Context,
        _args: Value,
    ) -> Result<Value, PlatformError> {
        Err(PlatformError::Api {
            status: 402,
            code: Some("card_declined".to_string()),
            message: "Your card was declined.".to_string(),
        })
    }
}

/// Handler that forwards its arguments through the handle.
pub struct ForwardingHandler;

#[async_trait]
impl CapabilityHandler for ForwardingHandler {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        _args: Value,
    ) -> Result<Value, PlatformError> {
        handle.get("/v1/echo", agent_toolkit_mcp::FormParams::new()).await
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Object schema accepting an optional string `note`.
pub fn note_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "note": { "type": "string" }
        },
        "required": [],
        "additionalProperties": false
    })
}

/// Builds a descriptor with the note schema and no permission gate.
pub fn descriptor(name: ToolName, handler: Arc<dyn CapabilityHandler>) -> CapabilityDescriptor {
    CapabilityDescriptor {
        name,
        description: format!("Stub for {}.", name.as_str()),
        input_schema: note_schema(),
        required_permission: None,
        handler,
    }
}

/// Builds a restricted context from `resource:action` strings.
pub fn restricted(permissions: &[&str]) -> Context {
    let set = PermissionSet::parse_all(permissions.iter().copied()).unwrap();
    Context::new(Mode::Toolkit, Some(set), None)
}

/// Builds an unrestricted context scoped to `account`.
pub fn scoped(account: &str) -> Context {
    Context::new(Mode::Toolkit, None, Some(AccountId::new(account).unwrap()))
}

/// Parses a permission string.
pub fn permission(value: &str) -> Permission {
    Permission::parse(value).unwrap()
}
