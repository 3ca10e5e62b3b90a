// crates/agent-toolkit-mcp/tests/registry.rs
// ============================================================================
// Module: Capability Registry Tests
// Description: Permission filtering and ordering of session registries.
// Purpose: Ensure registries are deterministic subsequences of the catalog.
// Dependencies: agent-toolkit-core, agent-toolkit-mcp
// ============================================================================

//! ## Overview
//! Exercises registry construction against the standard catalog for
//! unrestricted, restricted, and empty permission sets.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps for clarity."
)]

mod common;

use agent_toolkit_core::Context;
use agent_toolkit_core::Mode;
use agent_toolkit_core::PermissionSet;
use agent_toolkit_core::ToolName;
use agent_toolkit_mcp::CapabilityRegistry;
use agent_toolkit_mcp::Catalog;
use common::restricted;
use common::scoped;

fn catalog_names(catalog: &Catalog) -> Vec<ToolName> {
    catalog.entries().iter().map(|entry| entry.descriptor.name).collect()
}

fn is_subsequence(candidate: &[ToolName], full: &[ToolName]) -> bool {
    let mut remaining = full.iter();
    candidate.iter().all(|name| remaining.any(|other| other == name))
}

fn sample_contexts() -> Vec<Context> {
    vec![
        Context::default(),
        restricted(&[]),
        restricted(&["customers:read"]),
        restricted(&["customers:create", "customers:read", "invoices:create"]),
        restricted(&["subscriptions:update", "coupons:read", "balance:read"]),
        restricted(&["products:create", "prices:create", "payment_links:create"]),
        scoped("acct_123"),
        Context::new(Mode::ModelContextProtocol, Some(PermissionSet::new()), None),
    ]
}

#[test]
fn unrestricted_context_exposes_full_catalog_in_order() {
    let catalog = Catalog::standard().unwrap();
    let registry = CapabilityRegistry::build(&catalog, &Context::default());
    assert_eq!(registry.names(), catalog_names(&catalog));
    assert_eq!(registry.names(), ToolName::all().to_vec());
}

#[test]
fn customers_read_exposes_list_but_not_create_product() {
    let catalog = Catalog::standard().unwrap();
    let registry = CapabilityRegistry::build(&catalog, &restricted(&["customers:read"]));
    assert!(registry.contains(ToolName::ListCustomers));
    assert!(!registry.contains(ToolName::CreateProduct));
    assert!(!registry.contains(ToolName::CreateCustomer));
    assert!(registry.contains(ToolName::SearchDocumentation));
}

#[test]
fn empty_permission_set_keeps_only_ungated_tools() {
    let catalog = Catalog::standard().unwrap();
    let registry = CapabilityRegistry::build(&catalog, &restricted(&[]));
    for descriptor in registry.descriptors() {
        assert!(descriptor.required_permission.is_none(), "{}", descriptor.name.as_str());
    }
    assert!(registry.contains(ToolName::SearchDocumentation));
}

#[test]
fn membership_matches_permission_rule_for_all_contexts() {
    let catalog = Catalog::standard().unwrap();
    for context in sample_contexts() {
        let registry = CapabilityRegistry::build(&catalog, &context);
        for entry in catalog.entries() {
            let descriptor = &entry.descriptor;
            let expected = match (descriptor.required_permission, context.permissions()) {
                (None, _) | (Some(_), None) => true,
                (Some(required), Some(granted)) => granted.contains(required),
            };
            assert_eq!(
                registry.contains(descriptor.name),
                expected,
                "{}",
                descriptor.name.as_str()
            );
        }
    }
}

#[test]
fn filtering_never_reorders() {
    let catalog = Catalog::standard().unwrap();
    let full = catalog_names(&catalog);
    for context in sample_contexts() {
        let registry = CapabilityRegistry::build(&catalog, &context);
        assert!(is_subsequence(&registry.names(), &full));
    }
}

#[test]
fn building_twice_with_equal_contexts_is_idempotent() {
    let catalog = Catalog::standard().unwrap();
    for context in sample_contexts() {
        let first = CapabilityRegistry::build(&catalog, &context);
        let second = CapabilityRegistry::build(&catalog, &context.clone());
        assert_eq!(first.names(), second.names());
        assert_eq!(first.definitions(), second.definitions());
    }
}

#[test]
fn account_scope_and_mode_do_not_affect_membership() {
    let catalog = Catalog::standard().unwrap();
    let plain = CapabilityRegistry::build(&catalog, &Context::default());
    let scoped_registry = CapabilityRegistry::build(&catalog, &scoped("acct_123"));
    let mcp_context = Context::new(Mode::ModelContextProtocol, None, None);
    let mcp = CapabilityRegistry::build(&catalog, &mcp_context);
    assert_eq!(plain.names(), scoped_registry.names());
    assert_eq!(plain.names(), mcp.names());
}

#[test]
fn lookup_by_name_returns_matching_descriptor() {
    let catalog = Catalog::standard().unwrap();
    let registry = CapabilityRegistry::build(&catalog, &Context::default());
    let descriptor = registry.get(ToolName::CreateRefund).unwrap();
    assert_eq!(descriptor.name, ToolName::CreateRefund);
    assert_eq!(registry.len(), catalog.len());
    assert!(!registry.is_empty());
}
