// crates/agent-toolkit-contract/tests/tool_name_order.rs
// ============================================================================
// Module: Tool Name Ordering Tests
// Description: Ensure canonical tool ordering stays consistent.
// Purpose: Prevent drift between ToolName::all and tool contract ordering.
// Dependencies: agent-toolkit-contract
// ============================================================================

//! ## Overview
//! Confirms the canonical tool ordering used by registries and listings is
//! stable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_contract::ToolName;
use agent_toolkit_contract::tool_contracts;
use agent_toolkit_contract::tool_definitions;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn tool_name_order_matches_tool_contracts() {
    let contract_names: Vec<ToolName> =
        tool_contracts().into_iter().map(|contract| contract.name).collect();
    assert_eq!(
        ToolName::all(),
        contract_names.as_slice(),
        "ToolName::all order drifted from tool_contracts()",
    );
}

#[test]
fn tool_definitions_follow_contract_order() {
    let definition_names: Vec<ToolName> =
        tool_definitions().into_iter().map(|definition| definition.name).collect();
    assert_eq!(ToolName::all(), definition_names.as_slice());
}
