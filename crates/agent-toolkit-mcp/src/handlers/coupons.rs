// crates/agent-toolkit-mcp/src/handlers/coupons.rs
// ============================================================================
// Module: Coupon Handlers
// Description: Create and list coupons.
// Purpose: Back the `create_coupon` and `list_coupons` tools.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Coupons carry either a percentage or a fixed amount, never both. Both the
//! schema and the handler enforce this. Creation returns only the coupon id.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Number;
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

/// Arguments for `create_coupon`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateCouponRequest {
    /// Display name.
    name: String,
    /// Percentage discount.
    percent_off: Option<Number>,
    /// Fixed discount in the smallest currency unit.
    amount_off: Option<u64>,
    /// Currency for `amount_off`.
    currency: Option<String>,
    /// Discount duration.
    duration: Option<String>,
    /// Months for repeating discounts.
    duration_in_months: Option<u64>,
}

/// Arguments for `list_coupons`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListCouponsRequest {
    /// Page size.
    limit: Option<u64>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler for `create_coupon`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateCoupon;

#[async_trait]
impl CapabilityHandler for CreateCoupon {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreateCouponRequest = decode(args)?;
        if request.percent_off.is_some() == request.amount_off.is_some() {
            return Err(PlatformError::InvalidRequest(
                "exactly one of percent_off or amount_off is required".to_string(),
            ));
        }
        let params = FormParams::new()
            .with("name", request.name)
            .with_opt("percent_off", request.percent_off)
            .with_opt("amount_off", request.amount_off)
            .with_opt("currency", request.currency)
            .with_opt("duration", request.duration)
            .with_opt("duration_in_months", request.duration_in_months);
        let coupon = handle.post("/v1/coupons", params).await?;
        Ok(pick(&coupon, &[("id", "id")]))
    }
}

/// Handler for `list_coupons`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCoupons;

#[async_trait]
impl CapabilityHandler for ListCoupons {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: ListCouponsRequest = decode(args)?;
        let params = FormParams::new().with_opt("limit", request.limit);
        let coupons = handle.get("/v1/coupons", params).await?;
        Ok(pick_each(
            coupons,
            &[
                ("id", "id"),
                ("name", "name"),
                ("percent_off", "percent_off"),
                ("amount_off", "amount_off"),
                ("duration", "duration"),
            ],
        ))
    }
}
