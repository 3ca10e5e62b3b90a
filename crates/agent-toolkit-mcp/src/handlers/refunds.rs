// crates/agent-toolkit-mcp/src/handlers/refunds.rs
// ============================================================================
// Module: Refund Handlers
// Description: Refund payment intents.
// Purpose: Back the `create_refund` tool.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Refunds a payment intent in full, or partially when `amount` is given.
//! The result keeps the refund id, status, and amount.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::decode;
use super::pick;
use crate::catalog::CapabilityHandler;
use crate::handle::CapabilityHandle;
use crate::handle::FormParams;
use crate::handle::PlatformError;

/// Arguments for `create_refund`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateRefundRequest {
    /// Payment intent to refund.
    payment_intent: String,
    /// Partial amount; omitted refunds the full amount.
    amount: Option<u64>,
}

/// Handler for `create_refund`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateRefund;

#[async_trait]
impl CapabilityHandler for CreateRefund {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreateRefundRequest = decode(args)?;
        let params = FormParams::new()
            .with("payment_intent", request.payment_intent)
            .with_opt("amount", request.amount);
        let refund = handle.post("/v1/refunds", params).await?;
        Ok(pick(&refund, &[("id", "id"), ("status", "status"), ("amount", "amount")]))
    }
}
