// crates/agent-toolkit-mcp/src/catalog.rs
// ============================================================================
// Module: Capability Catalog
// Description: Static set of capability descriptors with compiled schemas.
// Purpose: Pair canonical tool contracts with their handlers.
// Dependencies: agent-toolkit-contract, agent-toolkit-core, async-trait
// ============================================================================

//! ## Overview
//! The catalog is the context-independent list of every capability the
//! toolkit offers. Each [`CapabilityDescriptor`] carries a name, a
//! description, a JSON input schema, an optional required permission, and a
//! [`CapabilityHandler`]. Building a [`Catalog`] compiles each schema once and
//! rejects duplicate names, so registries built from it never need to.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use agent_toolkit_contract::ToolContract;
use agent_toolkit_contract::ToolDefinition;
use agent_toolkit_contract::tool_contracts;
use agent_toolkit_core::Context;
use agent_toolkit_core::Permission;
use agent_toolkit_core::ToolName;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::handle::CapabilityHandle;
use crate::handle::PlatformError;
use crate::handlers::handler_for;
use crate::validation::ArgumentValidator;

// ============================================================================
// SECTION: Handler Trait
// ============================================================================

/// Executes one capability against the platform.
///
/// Arguments have already passed schema validation when `execute` runs.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Runs the capability and returns its JSON result.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the remote call fails or the arguments
    /// cannot be mapped onto a request.
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError>;
}

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// Static description of one capability.
#[derive(Clone)]
pub struct CapabilityDescriptor {
    /// Unique capability name.
    pub name: ToolName,
    /// Human-readable description shown to models.
    pub description: String,
    /// JSON input schema.
    pub input_schema: Value,
    /// Permission required to expose the capability; `None` means ungated.
    pub required_permission: Option<Permission>,
    /// Executing handler.
    pub handler: Arc<dyn CapabilityHandler>,
}

impl CapabilityDescriptor {
    /// Builds a descriptor from a canonical contract and a handler.
    #[must_use]
    pub fn from_contract(contract: ToolContract, handler: Arc<dyn CapabilityHandler>) -> Self {
        Self {
            name: contract.name,
            description: contract.description,
            input_schema: contract.input_schema,
            required_permission: contract.required_permission,
            handler,
        }
    }

    /// Returns the externally visible tool definition.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for CapabilityDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CapabilityDescriptor")
            .field("name", &self.name)
            .field("required_permission", &self.required_permission)
            .finish_non_exhaustive()
    }
}

/// Descriptor bundled with its compiled argument validator.
pub struct CatalogEntry {
    /// Capability descriptor.
    pub descriptor: CapabilityDescriptor,
    /// Compiled input schema.
    pub validator: ArgumentValidator,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two descriptors share a name.
    #[error("duplicate capability name: {0}")]
    DuplicateName(ToolName),
    /// A descriptor's input schema is not a usable object schema.
    #[error("malformed input schema for {name}: {reason}")]
    MalformedSchema {
        /// Capability name.
        name: ToolName,
        /// Compilation failure.
        reason: String,
    },
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Ordered, validated capability catalog.
///
/// # Invariants
/// - Names are unique.
/// - Entry order is the construction order and is preserved by registries.
#[derive(Clone)]
pub struct Catalog {
    /// Entries in catalog order.
    entries: Vec<Arc<CatalogEntry>>,
}

impl Catalog {
    /// Builds a catalog from descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for duplicate names or malformed schemas.
    pub fn new(descriptors: Vec<CapabilityDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(descriptors.len());
        let mut entries = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if !seen.insert(descriptor.name) {
                return Err(CatalogError::DuplicateName(descriptor.name));
            }
            let validator = ArgumentValidator::compile(&descriptor.input_schema).map_err(
                |reason| CatalogError::MalformedSchema {
                    name: descriptor.name,
                    reason,
                },
            )?;
            entries.push(Arc::new(CatalogEntry {
                descriptor,
                validator,
            }));
        }
        Ok(Self {
            entries,
        })
    }

    /// Builds the standard catalog from the canonical contracts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if a canonical schema fails to compile.
    pub fn standard() -> Result<Self, CatalogError> {
        let descriptors = tool_contracts()
            .into_iter()
            .map(|contract| {
                let handler = handler_for(contract.name);
                CapabilityDescriptor::from_contract(contract, handler)
            })
            .collect();
        Self::new(descriptors)
    }

    /// Returns the entries in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<ToolName> = self.entries.iter().map(|entry| entry.descriptor.name).collect();
        formatter.debug_struct("Catalog").field("names", &names).finish()
    }
}
