//! Context permission gating tests.
//!
//! ## Purpose
//! These tests exercise [`Context::permits`] and [`AccountId`] validation with
//! both fixed cases and randomized permission grants.
//!
//! ## What is covered
//! - Tools without a required permission are always available.
//! - Unrestricted contexts permit everything; empty grants permit nothing gated.
//! - Account identifiers reject empty, oversized, and whitespace values.
// crates/agent-toolkit-core/tests/context_permits.rs
// ============================================================================
// Module: Context Permission Tests
// Description: Property checks for permission gating and account validation.
// Purpose: Ensure availability rules are total and fail closed.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use agent_toolkit_core::AccountId;
use agent_toolkit_core::Context;
use agent_toolkit_core::Mode;
use agent_toolkit_core::Permission;
use agent_toolkit_core::PermissionAction;
use agent_toolkit_core::PermissionSet;
use agent_toolkit_core::Resource;
use agent_toolkit_core::ToolName;
use proptest::prelude::*;

const RESOURCES: [Resource; 11] = [
    Resource::Customers,
    Resource::Products,
    Resource::Prices,
    Resource::PaymentLinks,
    Resource::Invoices,
    Resource::InvoiceItems,
    Resource::Balance,
    Resource::Refunds,
    Resource::PaymentIntents,
    Resource::Subscriptions,
    Resource::Coupons,
];

const ACTIONS: [PermissionAction; 3] =
    [PermissionAction::Create, PermissionAction::Read, PermissionAction::Update];

fn permission_strategy() -> impl Strategy<Value = Permission> {
    (0 .. RESOURCES.len(), 0 .. ACTIONS.len())
        .prop_map(|(resource, action)| Permission::new(RESOURCES[resource], ACTIONS[action]))
}

#[test]
fn default_context_is_unrestricted_toolkit_mode() {
    let context = Context::default();
    assert_eq!(context.mode(), Mode::Toolkit);
    assert!(context.permissions().is_none());
    assert!(context.account().is_none());
    assert!(context.permits(Some(Permission::new(Resource::Refunds, PermissionAction::Create))));
}

#[test]
fn empty_grant_only_permits_ungated_tools() {
    let context = Context::new(Mode::Toolkit, Some(PermissionSet::new()), None);
    assert!(context.permits(None));
    assert!(!context.permits(Some(Permission::new(Resource::Balance, PermissionAction::Read))));
}

#[test]
fn account_id_rejects_invalid_values() {
    assert!(AccountId::new("").is_err());
    assert!(AccountId::new("acct 123").is_err());
    assert!(AccountId::new("a".repeat(256)).is_err());
    assert_eq!(AccountId::new("acct_123").unwrap().as_str(), "acct_123");
}

#[test]
fn mode_serializes_with_protocol_label() {
    let value = serde_json::to_string(&Mode::ModelContextProtocol).unwrap();
    assert_eq!(value, "\"modelcontextprotocol\"");
}

#[test]
fn tool_names_parse_their_own_labels() {
    for name in ToolName::all() {
        assert_eq!(ToolName::parse(name.as_str()), Some(*name));
    }
    assert_eq!(ToolName::parse("Create_Customer"), None);
    assert_eq!(ToolName::parse("createCustomer"), None);
}

proptest! {
    #[test]
    fn permits_matches_grant_membership(
        granted in proptest::collection::vec(permission_strategy(), 0 .. 12),
        required in permission_strategy(),
    ) {
        let set: PermissionSet = granted.iter().copied().collect();
        let context = Context::new(Mode::Toolkit, Some(set), None);
        prop_assert_eq!(context.permits(Some(required)), granted.contains(&required));
        prop_assert!(context.permits(None));
    }

    #[test]
    fn permission_display_parses_back(permission in permission_strategy()) {
        let parsed = Permission::parse(&permission.to_string());
        prop_assert_eq!(parsed, Ok(permission));
    }
}
