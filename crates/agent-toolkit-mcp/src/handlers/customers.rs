// crates/agent-toolkit-mcp/src/handlers/customers.rs
// ============================================================================
// Module: Customer Handlers
// Description: Create and list customers.
// Purpose: Back the `create_customer` and `list_customers` tools.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Creation returns only the new customer id; listings return summary fields
//! so customer metadata is not echoed back to the agent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::decode;
use super::pick;
use super::pick_each;
use crate::catalog::CapabilityHandler;
use crate::handle::CapabilityHandle;
use crate::handle::FormParams;
use crate::handle::PlatformError;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Arguments for `create_customer`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateCustomerRequest {
    /// Customer name.
    name: String,
    /// Optional customer email.
    email: Option<String>,
}

/// Arguments for `list_customers`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListCustomersRequest {
    /// Page size.
    limit: Option<u64>,
    /// Exact email filter.
    email: Option<String>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler for `create_customer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateCustomer;

#[async_trait]
impl CapabilityHandler for CreateCustomer {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreateCustomerRequest = decode(args)?;
        let params = FormParams::new().with("name", request.name).with_opt("email", request.email);
        let customer = handle.post("/v1/customers", params).await?;
        Ok(pick(&customer, &[("id", "id")]))
    }
}

/// Handler for `list_customers`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCustomers;

#[async_trait]
impl CapabilityHandler for ListCustomers {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: ListCustomersRequest = decode(args)?;
        let params =
            FormParams::new().with_opt("limit", request.limit).with_opt("email", request.email);
        let customers = handle.get("/v1/customers", params).await?;
        Ok(pick_each(customers, &[("id", "id"), ("name", "name"), ("email", "email")]))
    }
}
