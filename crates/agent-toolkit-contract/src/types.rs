// crates/agent-toolkit-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Tool definition and contract payloads.
// Purpose: Shared shapes for tool listings and catalog construction.
// Dependencies: agent-toolkit-core, serde, serde_json
// ============================================================================

//! ## Overview
//! [`ToolContract`] is the full catalog entry; [`ToolDefinition`] is the
//! introspection view returned to clients, which omits permission metadata.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Permission;
use agent_toolkit_core::ToolName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Tooling Contracts
// ============================================================================

/// Tool definition used by tool listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool contract with input schema and permission gate.
///
/// # Invariants
/// - `input_schema` is a JSON object schema.
/// - `required_permission` is `None` only for tools that touch no account data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContract {
    /// Tool name.
    pub name: ToolName,
    /// Tool description.
    pub description: String,
    /// JSON schema for tool input payload.
    pub input_schema: Value,
    /// Permission required for the tool to be listed and dispatched.
    pub required_permission: Option<Permission>,
    /// Example payloads for documentation and tests.
    pub examples: Vec<ToolExample>,
    /// Notes describing tool usage.
    pub notes: Vec<String>,
}

impl ToolContract {
    /// Returns the listing view of this contract.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Tool example input payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExample {
    /// Example description.
    pub description: String,
    /// Example input payload.
    pub input: Value,
}
