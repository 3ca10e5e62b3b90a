// crates/agent-toolkit-mcp/src/telemetry.rs
// ============================================================================
// Module: Tool Telemetry
// Description: Metric hooks for tool dispatch.
// Purpose: Expose call counters and latencies without a metrics backend.
// Dependencies: agent-toolkit-core
// ============================================================================

//! ## Overview
//! Deployments plug a [`ToolMetrics`] implementation into the tool router to
//! export call counts and latency histograms. Labels are limited to the tool
//! name, outcome, and a stable error kind; arguments never reach telemetry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use agent_toolkit_core::Mode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for tool call histograms.
pub const TOOL_LATENCY_BUCKETS_MS: &[u64] =
    &[5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Tool call outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    /// Handler returned a serialized result.
    Ok,
    /// Dispatch failed.
    Error,
}

impl ToolOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Tool call metric event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMetricEvent {
    /// Requested tool name, truncated for labeling.
    pub tool: String,
    /// Session mode.
    pub mode: Mode,
    /// Call outcome.
    pub outcome: ToolOutcome,
    /// Stable error kind when the call failed.
    pub error_kind: Option<&'static str>,
    /// Serialized response size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for tool calls.
pub trait ToolMetrics: Send + Sync {
    /// Records a call counter event.
    fn record_call(&self, event: &ToolMetricEvent);
    /// Records a latency observation for the call.
    fn record_latency(&self, event: &ToolMetricEvent, latency: Duration);
}

/// No-op metrics sink.
pub struct NoopMetrics;

impl ToolMetrics for NoopMetrics {
    fn record_call(&self, _event: &ToolMetricEvent) {}

    fn record_latency(&self, _event: &ToolMetricEvent, _latency: Duration) {}
}
