// crates/agent-toolkit-mcp/src/handlers/products.rs
// ============================================================================
// Module: Product Handlers
// Description: Create and list products.
// Purpose: Back the `create_product` and `list_products` tools.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Product creation and listing.

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

/// Arguments for `create_product`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateProductRequest {
    /// Product name.
    name: String,
    /// Optional product description.
    description: Option<String>,
}

/// Arguments for `list_products`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListProductsRequest {
    /// Page size.
    limit: Option<u64>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler for `create_product`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateProduct;

#[async_trait]
impl CapabilityHandler for CreateProduct {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreateProductRequest = decode(args)?;
        let params = FormParams::new()
            .with("name", request.name)
            .with_opt("description", request.description);
        handle.post("/v1/products", params).await
    }
}

/// Handler for `list_products`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListProducts;

#[async_trait]
impl CapabilityHandler for ListProducts {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: ListProductsRequest = decode(args)?;
        let params = FormParams::new().with_opt("limit", request.limit);
        Ok(list_data(handle.get("/v1/products", params).await?))
    }
}
