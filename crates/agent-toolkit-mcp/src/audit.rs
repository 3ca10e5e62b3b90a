// crates/agent-toolkit-mcp/src/audit.rs
// ============================================================================
// Module: Toolkit Audit Logging
// Description: Structured audit events for tool calls, metering, and authz.
// Purpose: Emit redacted JSON-line audit logs without hard dependencies.
// Dependencies: agent-toolkit-config, agent-toolkit-core, serde
// ============================================================================

//! ## Overview
//! Audit events are JSON lines routed to a [`ToolAuditSink`]. Tool call events
//! record the tool name, outcome, error kind, and whether the session is
//! scoped to a connected account. Raw arguments, responses, customer
//! identifiers, and credentials are never written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use agent_toolkit_config::AuditConfig;
use agent_toolkit_config::AuditSinkKind;
use agent_toolkit_core::Mode;
use serde::Serialize;

use crate::auth::AuthAuditEvent;
use crate::telemetry::ToolOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum tool name length written to audit events.
const MAX_AUDIT_TOOL_NAME: usize = 64;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Tool call audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Requested tool name, truncated.
    pub tool: String,
    /// Call outcome.
    pub outcome: ToolOutcome,
    /// Stable error kind when the call failed.
    pub error_kind: Option<&'static str>,
    /// True when the session is scoped to a connected account.
    pub account_scoped: bool,
    /// Session mode label.
    pub mode: &'static str,
    /// Call latency in milliseconds.
    pub latency_ms: u128,
    /// Serialized response size in bytes.
    pub response_bytes: usize,
}

/// Inputs required to construct a tool call audit event.
pub struct ToolCallAuditParams<'a> {
    /// Requested tool name.
    pub tool: &'a str,
    /// Call outcome.
    pub outcome: ToolOutcome,
    /// Stable error kind when the call failed.
    pub error_kind: Option<&'static str>,
    /// True when the session is scoped to a connected account.
    pub account_scoped: bool,
    /// Session mode.
    pub mode: Mode,
    /// Call latency in milliseconds.
    pub latency_ms: u128,
    /// Serialized response size in bytes.
    pub response_bytes: usize,
}

impl ToolCallAuditEvent {
    /// Creates a new tool call event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ToolCallAuditParams<'_>) -> Self {
        Self {
            event: "tool_call",
            timestamp_ms: now_ms(),
            tool: truncate(params.tool, MAX_AUDIT_TOOL_NAME),
            outcome: params.outcome,
            error_kind: params.error_kind,
            account_scoped: params.account_scoped,
            mode: params.mode.as_str(),
            latency_ms: params.latency_ms,
            response_bytes: params.response_bytes,
        }
    }
}

/// Meter event audit payload.
#[derive(Debug, Clone, Serialize)]
pub struct MeterAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Meter event name.
    pub meter: String,
    /// Recording outcome.
    pub outcome: ToolOutcome,
    /// Stable error kind when recording failed.
    pub error_kind: Option<&'static str>,
    /// True when the session is scoped to a connected account.
    pub account_scoped: bool,
}

impl MeterAuditEvent {
    /// Creates a new meter event with a consistent timestamp.
    #[must_use]
    pub fn new(meter: &str, error_kind: Option<&'static str>, account_scoped: bool) -> Self {
        let outcome = if error_kind.is_some() { ToolOutcome::Error } else { ToolOutcome::Ok };
        Self {
            event: "meter_event",
            timestamp_ms: now_ms(),
            meter: truncate(meter, MAX_AUDIT_TOOL_NAME),
            outcome,
            error_kind,
            account_scoped,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for toolkit events.
pub trait ToolAuditSink: Send + Sync {
    /// Record a tool call event.
    fn record_tool_call(&self, event: &ToolCallAuditEvent);

    /// Record a meter event.
    fn record_meter(&self, _event: &MeterAuditEvent) {}

    /// Record a server authorization decision.
    fn record_authz(&self, _event: &AuthAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ToolAuditSink for StderrAuditSink {
    fn record_tool_call(&self, event: &ToolCallAuditEvent) {
        write_stderr(event);
    }

    fn record_meter(&self, event: &MeterAuditEvent) {
        write_stderr(event);
    }

    fn record_authz(&self, event: &AuthAuditEvent) {
        write_stderr(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ToolAuditSink for FileAuditSink {
    fn record_tool_call(&self, event: &ToolCallAuditEvent) {
        self.append(event);
    }

    fn record_meter(&self, event: &MeterAuditEvent) {
        self.append(event);
    }

    fn record_authz(&self, event: &AuthAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ToolAuditSink for NoopAuditSink {
    fn record_tool_call(&self, _event: &ToolCallAuditEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns an error if a file sink cannot be opened.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn ToolAuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::File, Some(path)) => Ok(Arc::new(FileAuditSink::new(Path::new(path))?)),
        (AuditSinkKind::File, None) => {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "audit.path is required for file sink"))
        }
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Truncates a label on a character boundary.
fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Writes one serialized event to stderr.
fn write_stderr<T: Serialize>(event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
