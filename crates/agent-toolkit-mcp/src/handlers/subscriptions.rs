// crates/agent-toolkit-mcp/src/handlers/subscriptions.rs
// ============================================================================
// Module: Subscription Handlers
// Description: List, cancel, and update subscriptions.
// Purpose: Back the subscription tools.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Subscription identifiers are interpolated into request paths, so they are
//! checked with [`path_segment`] before any request is issued. Item updates
//! are flattened into indexed form keys (`items[0][price]`).

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
use crate::handle::path_segment;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Arguments for `list_subscriptions`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListSubscriptionsRequest {
    /// Optional customer filter.
    customer: Option<String>,
    /// Optional price filter.
    price: Option<String>,
    /// Optional status filter.
    status: Option<String>,
    /// Page size.
    limit: Option<u64>,
}

/// Arguments for `cancel_subscription`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CancelSubscriptionRequest {
    /// Subscription to cancel.
    subscription: String,
}

/// Arguments for `update_subscription`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateSubscriptionRequest {
    /// Subscription to update.
    subscription: String,
    /// Proration behavior for item changes.
    proration_behavior: Option<String>,
    /// Item additions, changes, and removals.
    #[serde(default)]
    items: Vec<SubscriptionItemUpdate>,
}

/// One subscription item change.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubscriptionItemUpdate {
    /// Existing item identifier.
    id: Option<String>,
    /// Price for the item.
    price: Option<String>,
    /// Item quantity.
    quantity: Option<u64>,
    /// Removes the item when true.
    deleted: Option<bool>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler for `list_subscriptions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSubscriptions;

#[async_trait]
impl CapabilityHandler for ListSubscriptions {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: ListSubscriptionsRequest = decode(args)?;
        let params = FormParams::new()
            .with_opt("customer", request.customer)
            .with_opt("price", request.price)
            .with_opt("status", request.status)
            .with_opt("limit", request.limit);
        Ok(list_data(handle.get("/v1/subscriptions", params).await?))
    }
}

/// Handler for `cancel_subscription`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelSubscription;

#[async_trait]
impl CapabilityHandler for CancelSubscription {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CancelSubscriptionRequest = decode(args)?;
        let path = format!("/v1/subscriptions/{}", path_segment(&request.subscription)?);
        handle.delete(&path, FormParams::new()).await
    }
}

/// Handler for `update_subscription`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateSubscription;

#[async_trait]
impl CapabilityHandler for UpdateSubscription {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: UpdateSubscriptionRequest = decode(args)?;
        let path = format!("/v1/subscriptions/{}", path_segment(&request.subscription)?);
        let mut params =
            FormParams::new().with_opt("proration_behavior", request.proration_behavior);
        for (index, item) in request.items.into_iter().enumerate() {
            params = params
                .with_opt(format!("items[{index}][id]"), item.id)
                .with_opt(format!("items[{index}][price]"), item.price)
                .with_opt(format!("items[{index}][quantity]"), item.quantity)
                .with_opt(format!("items[{index}][deleted]"), item.deleted);
        }
        handle.post(&path, params).await
    }
}
