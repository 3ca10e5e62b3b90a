// crates/agent-toolkit-mcp/src/handlers/mod.rs
// ============================================================================
// Module: Capability Handlers
// Description: One handler per catalog tool, grouped by platform resource.
// Purpose: Map validated tool arguments onto single remote operations.
// Dependencies: agent-toolkit-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Each handler decodes its validated arguments into a typed request struct,
//! issues exactly one remote call through the [`CapabilityHandle`], and maps
//! the platform response onto the fields an agent needs.
//!
//! [`CapabilityHandle`]: crate::handle::CapabilityHandle

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod balance;
pub mod coupons;
pub mod customers;
pub mod documentation;
pub mod invoices;
pub mod payment_intents;
pub mod payment_links;
pub mod prices;
pub mod products;
pub mod refunds;
pub mod subscriptions;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use agent_toolkit_core::ToolName;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::catalog::CapabilityHandler;
use crate::handle::PlatformError;

// ============================================================================
// SECTION: Handler Lookup
// ============================================================================

/// Returns the standard handler for a tool.
#[must_use]
pub fn handler_for(name: ToolName) -> Arc<dyn CapabilityHandler> {
    match name {
        ToolName::CreateCustomer => Arc::new(customers::CreateCustomer),
        ToolName::ListCustomers => Arc::new(customers::ListCustomers),
        ToolName::CreateProduct => Arc::new(products::CreateProduct),
        ToolName::ListProducts => Arc::new(products::ListProducts),
        ToolName::CreatePrice => Arc::new(prices::CreatePrice),
        ToolName::ListPrices => Arc::new(prices::ListPrices),
        ToolName::CreatePaymentLink => Arc::new(payment_links::CreatePaymentLink),
        ToolName::CreateInvoice => Arc::new(invoices::CreateInvoice),
        ToolName::ListInvoices => Arc::new(invoices::ListInvoices),
        ToolName::CreateInvoiceItem => Arc::new(invoices::CreateInvoiceItem),
        ToolName::FinalizeInvoice => Arc::new(invoices::FinalizeInvoice),
        ToolName::RetrieveBalance => Arc::new(balance::RetrieveBalance),
        ToolName::CreateRefund => Arc::new(refunds::CreateRefund),
        ToolName::ListPaymentIntents => Arc::new(payment_intents::ListPaymentIntents),
        ToolName::ListSubscriptions => Arc::new(subscriptions::ListSubscriptions),
        ToolName::CancelSubscription => Arc::new(subscriptions::CancelSubscription),
        ToolName::UpdateSubscription => Arc::new(subscriptions::UpdateSubscription),
        ToolName::SearchDocumentation => Arc::new(documentation::SearchDocumentation),
        ToolName::ListCoupons => Arc::new(coupons::ListCoupons),
        ToolName::CreateCoupon => Arc::new(coupons::CreateCoupon),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes validated arguments into a typed request.
pub(crate) fn decode<T: for<'de> Deserialize<'de>>(args: Value) -> Result<T, PlatformError> {
    serde_json::from_value(args).map_err(|err| PlatformError::InvalidRequest(err.to_string()))
}

/// Returns the `data` array of a list response, or an empty array.
pub(crate) fn list_data(response: Value) -> Value {
    match response {
        Value::Object(mut object) => match object.remove("data") {
            Some(data @ Value::Array(_)) => data,
            _ => Value::Array(Vec::new()),
        },
        _ => Value::Array(Vec::new()),
    }
}

/// Projects an object onto `fields`; absent fields become `null`.
pub(crate) fn pick(source: &Value, fields: &[(&str, &str)]) -> Value {
    let mut object = Map::with_capacity(fields.len());
    for (output, input) in fields {
        let value = source.get(*input).cloned().unwrap_or(Value::Null);
        object.insert((*output).to_string(), value);
    }
    Value::Object(object)
}

/// Projects every element of a list response onto `fields`.
pub(crate) fn pick_each(response: Value, fields: &[(&str, &str)]) -> Value {
    match list_data(response) {
        Value::Array(items) => Value::Array(items.iter().map(|item| pick(item, fields)).collect()),
        other => other,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
