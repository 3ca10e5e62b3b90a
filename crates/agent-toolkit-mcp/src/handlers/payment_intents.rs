// crates/agent-toolkit-mcp/src/handlers/payment_intents.rs
// ============================================================================
// Module: Payment Intent Handlers
// Description: List payment intents.
// Purpose: Back the `list_payment_intents` tool.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Listing unwraps the platform list envelope to its `data` array.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::decode;
use super::list_data;
use crate::catalog::CapabilityHandler;
use crate::handle::CapabilityHandle;
use crate::handle::FormParams;
use crate::handle::PlatformError;

/// Arguments for `list_payment_intents`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListPaymentIntentsRequest {
    /// Optional customer filter.
    customer: Option<String>,
    /// Page size.
    limit: Option<u64>,
}

/// Handler for `list_payment_intents`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPaymentIntents;

#[async_trait]
impl CapabilityHandler for ListPaymentIntents {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: ListPaymentIntentsRequest = decode(args)?;
        let params = FormParams::new()
            .with_opt("customer", request.customer)
            .with_opt("limit", request.limit);
        Ok(list_data(handle.get("/v1/payment_intents", params).await?))
    }
}
