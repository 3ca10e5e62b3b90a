// crates/agent-toolkit-contract/src/lib.rs
// ============================================================================
// Module: Agent Toolkit Contract Library
// Description: Canonical tool contract catalog for the Agent Toolkit.
// Purpose: Single source of truth for tool names, schemas, and permissions.
// Dependencies: agent-toolkit-core, serde, serde_json
// ============================================================================

//! ## Overview
//! `agent-toolkit-contract` defines the static, ordered catalog of tool
//! contracts. Each contract carries the tool's description, its JSON input
//! schema, and the permission required to expose it. The runtime pairs these
//! context-independent definitions with handlers; listings derive
//! [`ToolDefinition`] values from them.
//!
//! Security posture: tool inputs are untrusted and every schema closes its
//! object with `additionalProperties: false`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod tooling;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use agent_toolkit_core::ToolName;
pub use tooling::tool_contracts;
pub use tooling::tool_definitions;
pub use types::ToolContract;
pub use types::ToolDefinition;
pub use types::ToolExample;
