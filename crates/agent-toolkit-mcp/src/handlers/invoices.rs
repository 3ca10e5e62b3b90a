// crates/agent-toolkit-mcp/src/handlers/invoices.rs
// ============================================================================
// Module: Invoice Handlers
// Description: Create, list, itemize, and finalize invoices.
// Purpose: Back the invoice and invoice item tools.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Invoices are created as drafts billed by sending the invoice, filled with
//! invoice items, then finalized. Invoice responses are reduced to the id,
//! hosted url, customer, and status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::decode;
use super::list_data;
use super::pick;
use crate::catalog::CapabilityHandler;
use crate::handle::CapabilityHandle;
use crate::handle::FormParams;
use crate::handle::PlatformError;
use crate::handle::path_segment;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Collection method applied to every created invoice.
const COLLECTION_METHOD: &str = "send_invoice";
/// Invoice fields returned to the agent.
const INVOICE_FIELDS: [(&str, &str); 4] =
    [("id", "id"), ("url", "hosted_invoice_url"), ("customer", "customer"), ("status", "status")];

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Arguments for `create_invoice`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateInvoiceRequest {
    /// Customer billed by the invoice.
    customer: String,
    /// Days until the invoice is due.
    days_until_due: Option<u64>,
}

/// Arguments for `list_invoices`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListInvoicesRequest {
    /// Optional customer filter.
    customer: Option<String>,
    /// Page size.
    limit: Option<u64>,
}

/// Arguments for `create_invoice_item`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateInvoiceItemRequest {
    /// Customer the invoice belongs to.
    customer: String,
    /// Price of the line item.
    price: String,
    /// Draft invoice receiving the item.
    invoice: String,
}

/// Arguments for `finalize_invoice`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FinalizeInvoiceRequest {
    /// Draft invoice to finalize.
    invoice: String,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handler for `create_invoice`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateInvoice;

#[async_trait]
impl CapabilityHandler for CreateInvoice {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreateInvoiceRequest = decode(args)?;
        let params = FormParams::new()
            .with("customer", request.customer)
            .with("collection_method", COLLECTION_METHOD)
            .with_opt("days_until_due", request.days_until_due);
        let invoice = handle.post("/v1/invoices", params).await?;
        Ok(pick(&invoice, &INVOICE_FIELDS))
    }
}

/// Handler for `list_invoices`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListInvoices;

#[async_trait]
impl CapabilityHandler for ListInvoices {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: ListInvoicesRequest = decode(args)?;
        let params = FormParams::new()
            .with_opt("customer", request.customer)
            .with_opt("limit", request.limit);
        Ok(list_data(handle.get("/v1/invoices", params).await?))
    }
}

/// Handler for `create_invoice_item`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateInvoiceItem;

#[async_trait]
impl CapabilityHandler for CreateInvoiceItem {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: CreateInvoiceItemRequest = decode(args)?;
        let params = FormParams::new()
            .with("customer", request.customer)
            .with("price", request.price)
            .with("invoice", request.invoice);
        let item = handle.post("/v1/invoiceitems", params).await?;
        Ok(pick(&item, &[("id", "id"), ("invoice", "invoice")]))
    }
}

/// Handler for `finalize_invoice`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalizeInvoice;

#[async_trait]
impl CapabilityHandler for FinalizeInvoice {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: FinalizeInvoiceRequest = decode(args)?;
        let path = format!("/v1/invoices/{}/finalize", path_segment(&request.invoice)?);
        let invoice = handle.post(&path, FormParams::new()).await?;
        Ok(pick(&invoice, &INVOICE_FIELDS))
    }
}
