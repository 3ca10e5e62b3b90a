// crates/agent-toolkit-mcp/src/registry.rs
// ============================================================================
// Module: Capability Registry
// Description: Context-scoped subset of the capability catalog.
// Purpose: Decide which capabilities a session may see and call.
// Dependencies: agent-toolkit-contract, agent-toolkit-core
// ============================================================================

//! ## Overview
//! [`CapabilityRegistry::build`] filters the catalog by the session
//! [`Context`]. A capability is included when it requires no permission, when
//! the context is unrestricted, or when the context grants the required
//! permission. The result keeps catalog order and carries a name index so
//! dispatch never scans the list.
//!
//! ## Invariants
//! - Building is a pure function of the catalog and the context.
//! - Registry order is a subsequence of catalog order.
//! - An empty registry is valid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use agent_toolkit_contract::ToolDefinition;
use agent_toolkit_core::Context;
use agent_toolkit_core::ToolName;

use crate::catalog::CapabilityDescriptor;
use crate::catalog::Catalog;
use crate::catalog::CatalogEntry;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Capabilities available to one session.
#[derive(Clone)]
pub struct CapabilityRegistry {
    /// Included entries in catalog order.
    entries: Vec<Arc<CatalogEntry>>,
    /// Position of each included entry keyed by name.
    index: HashMap<ToolName, usize>,
}

impl CapabilityRegistry {
    /// Builds the registry for a context.
    #[must_use]
    pub fn build(catalog: &Catalog, context: &Context) -> Self {
        let entries: Vec<Arc<CatalogEntry>> = catalog
            .entries()
            .iter()
            .filter(|entry| context.permits(entry.descriptor.required_permission))
            .cloned()
            .collect();
        let index =
            entries.iter().enumerate().map(|(pos, entry)| (entry.descriptor.name, pos)).collect();
        Self {
            entries,
            index,
        }
    }

    /// Returns the descriptor for an included capability.
    #[must_use]
    pub fn get(&self, name: ToolName) -> Option<&CapabilityDescriptor> {
        self.resolve(name).map(|entry| &entry.descriptor)
    }

    /// Returns true when the capability is included.
    #[must_use]
    pub fn contains(&self, name: ToolName) -> bool {
        self.index.contains_key(&name)
    }

    /// Returns the included names in catalog order.
    #[must_use]
    pub fn names(&self) -> Vec<ToolName> {
        self.entries.iter().map(|entry| entry.descriptor.name).collect()
    }

    /// Returns the included descriptors in catalog order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Returns the introspection listing in catalog order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.descriptors().map(CapabilityDescriptor::definition).collect()
    }

    /// Returns the number of included capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no capability is included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the catalog entry, including its compiled validator.
    pub(crate) fn resolve(&self, name: ToolName) -> Option<&CatalogEntry> {
        self.index.get(&name).and_then(|pos| self.entries.get(*pos)).map(AsRef::as_ref)
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("CapabilityRegistry").field("names", &self.names()).finish()
    }
}
