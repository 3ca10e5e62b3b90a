// crates/agent-toolkit-mcp/src/handlers/prices.rs
// ============================================================================
// Module: Price Handlers
// Description: Create and list prices.
// Purpose: Back the `create_price` and `list_prices` tools.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Price creation returns the platform object; listings return the `data`
//! array, optionally filtered by product.

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

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Arguments for `create_price`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreatePriceRequest {
    /// Product the price belongs to.
    product: String,
    /// Amount in the smallest currency unit.
    unit_amount: u64,
    /// Lowercase ISO currency code.
    currency: String,
}

/// Arguments for `list_prices`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListPricesRequest {
    /// Optional product filter.
    product: Option<String>,
    /// Page size.
    limit: Option<u64>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler for `create_price`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatePrice;

#[async_trait]
impl CapabilityHandler for CreatePrice {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreatePriceRequest = decode(args)?;
        let params = FormParams::new()
            .with("product", request.product)
            .with("unit_amount", request.unit_amount)
            .with("currency", request.currency);
        handle.post("/v1/prices", params).await
    }
}

/// Handler for `list_prices`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPrices;

#[async_trait]
impl CapabilityHandler for ListPrices {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: ListPricesRequest = decode(args)?;
        let params =
            FormParams::new().with_opt("product", request.product).with_opt("limit", request.limit);
        Ok(list_data(handle.get("/v1/prices", params).await?))
    }
}
