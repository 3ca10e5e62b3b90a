// crates/agent-toolkit-mcp/src/handlers/payment_links.rs
// ============================================================================
// Module: Payment Link Handlers
// Description: Create shareable payment links.
// Purpose: Back the `create_payment_link` tool.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! A payment link is created for a single price and quantity. The result is
//! reduced to the link id and its shareable URL.

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

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Arguments for `create_payment_link`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreatePaymentLinkRequest {
    /// Price sold through the link.
    price: String,
    /// Quantity of the price per purchase.
    quantity: u64,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler for `create_payment_link`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatePaymentLink;

#[async_trait]
impl CapabilityHandler for CreatePaymentLink {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreatePaymentLinkRequest = decode(args)?;
        let params = FormParams::new()
            .with("line_items[0][price]", request.price)
            .with("line_items[0][quantity]", request.quantity);
        let link = handle.post("/v1/payment_links", params).await?;
        Ok(pick(&link, &[("id", "id"), ("url", "url")]))
    }
}
