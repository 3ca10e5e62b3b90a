// crates/agent-toolkit-mcp/src/tools.rs
// ============================================================================
// Module: Tool Dispatch
// Description: Name-based dispatch of validated tool calls.
// Purpose: One entry point that resolves, validates, invokes, and serializes.
// Dependencies: agent-toolkit-contract, agent-toolkit-core, serde_json
// ============================================================================

//! ## Overview
//! [`dispatch`] is the uniform invocation contract: resolve a name against
//! the session registry, validate the arguments against the compiled schema,
//! await the handler exactly once, and serialize its value as compact JSON.
//! [`ToolRouter`] wraps `dispatch` with audit and telemetry for the session
//! and the protocol server.
//!
//! ## Invariants
//! - Names that fail to parse or were filtered out are indistinguishable to
//!   callers; both yield [`ToolError::UnknownCapability`].
//! - Handlers never run when argument validation fails.
//! - Handler errors are wrapped, not reinterpreted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use agent_toolkit_contract::ToolDefinition;
use agent_toolkit_core::Context;
use agent_toolkit_core::ToolName;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::audit::ToolAuditSink;
use crate::audit::ToolCallAuditEvent;
use crate::audit::ToolCallAuditParams;
use crate::handle::CapabilityHandle;
use crate::handle::PlatformError;
use crate::registry::CapabilityRegistry;
use crate::telemetry::ToolMetricEvent;
use crate::telemetry::ToolMetrics;
use crate::telemetry::ToolOutcome;
use crate::validation::ArgumentError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool dispatch errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Name absent from the session registry.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),
    /// Arguments failed schema validation.
    #[error("invalid arguments: {field}: {reason}")]
    InvalidArguments {
        /// Offending field, or `arguments` for whole-payload failures.
        field: String,
        /// Human-readable reason.
        reason: String,
    },
    /// The handler failed.
    #[error("capability {name} failed: {source}")]
    CapabilityExecution {
        /// Capability that failed.
        name: ToolName,
        /// Underlying platform error.
        source: PlatformError,
    },
    /// The handler result could not be serialized.
    #[error("serialization failure")]
    Serialization,
}

impl ToolError {
    /// Returns a stable label for audit and telemetry.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownCapability(_) => "unknown_capability",
            Self::InvalidArguments {
                ..
            } => "invalid_arguments",
            Self::CapabilityExecution {
                ..
            } => "capability_execution",
            Self::Serialization => "serialization",
        }
    }
}

impl From<ArgumentError> for ToolError {
    fn from(error: ArgumentError) -> Self {
        Self::InvalidArguments {
            field: error.field,
            reason: error.reason,
        }
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Resolves, validates, invokes, and serializes one tool call.
///
/// `null` arguments are treated as an empty object.
///
/// # Errors
///
/// Returns [`ToolError`] for unknown names, invalid arguments, handler
/// failures, or serialization failures.
pub async fn dispatch(
    registry: &CapabilityRegistry,
    handle: &CapabilityHandle,
    context: &Context,
    name: &str,
    args: Value,
) -> Result<String, ToolError> {
    let entry = ToolName::parse(name)
        .and_then(|tool| registry.resolve(tool))
        .ok_or_else(|| ToolError::UnknownCapability(name.to_string()))?;
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    entry.validator.validate(&args)?;
    let descriptor = &entry.descriptor;
    let value = descriptor.handler.execute(handle, context, args).await.map_err(|source| {
        ToolError::CapabilityExecution {
            name: descriptor.name,
            source,
        }
    })?;
    serde_json::to_string(&value).map_err(|_| ToolError::Serialization)
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Session-scoped tool router with audit and telemetry.
#[derive(Clone)]
pub struct ToolRouter {
    /// Shared router state.
    inner: Arc<RouterInner>,
}

/// Shared state behind a [`ToolRouter`].
struct RouterInner {
    /// Session registry.
    registry: Arc<CapabilityRegistry>,
    /// Account-scoped capability handle.
    handle: CapabilityHandle,
    /// Session context.
    context: Arc<Context>,
    /// Audit sink for tool calls.
    audit: Arc<dyn ToolAuditSink>,
    /// Metrics sink for tool calls.
    metrics: Arc<dyn ToolMetrics>,
}

/// Configuration inputs for building a tool router.
pub struct ToolRouterConfig {
    /// Session registry.
    pub registry: Arc<CapabilityRegistry>,
    /// Account-scoped capability handle.
    pub handle: CapabilityHandle,
    /// Session context.
    pub context: Arc<Context>,
    /// Audit sink for tool calls.
    pub audit: Arc<dyn ToolAuditSink>,
    /// Metrics sink for tool calls.
    pub metrics: Arc<dyn ToolMetrics>,
}

impl ToolRouter {
    /// Creates a new tool router.
    #[must_use]
    pub fn new(config: ToolRouterConfig) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                registry: config.registry,
                handle: config.handle,
                context: config.context,
                audit: config.audit,
                metrics: config.metrics,
            }),
        }
    }

    /// Lists the tools available to the session, in catalog order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.inner.registry.definitions()
    }

    /// Dispatches a tool call and records audit and telemetry.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when dispatch fails.
    pub async fn call(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let inner = &self.inner;
        let started = Instant::now();
        let result = dispatch(&inner.registry, &inner.handle, &inner.context, name, args).await;
        let latency = started.elapsed();
        let (outcome, error_kind, response_bytes) = match &result {
            Ok(output) => (ToolOutcome::Ok, None, output.len()),
            Err(err) => (ToolOutcome::Error, Some(err.kind()), 0),
        };
        let mode = inner.context.mode();
        inner.audit.record_tool_call(&ToolCallAuditEvent::new(ToolCallAuditParams {
            tool: name,
            outcome,
            error_kind,
            account_scoped: inner.handle.account().is_some(),
            mode,
            latency_ms: latency.as_millis(),
            response_bytes,
        }));
        let metric = ToolMetricEvent {
            tool: name.chars().take(64).collect(),
            mode,
            outcome,
            error_kind,
            response_bytes,
        };
        inner.metrics.record_call(&metric);
        inner.metrics.record_latency(&metric, latency);
        result
    }

    /// Returns the session registry.
    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.inner.registry
    }

    /// Returns the account-scoped capability handle.
    #[must_use]
    pub fn handle(&self) -> &CapabilityHandle {
        &self.inner.handle
    }

    /// Returns the session context.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    /// Returns the audit sink.
    pub(crate) fn audit(&self) -> &dyn ToolAuditSink {
        self.inner.audit.as_ref()
    }
}
