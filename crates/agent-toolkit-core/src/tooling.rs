// crates/agent-toolkit-core/src/tooling.rs
// ============================================================================
// Module: Tooling Identifiers
// Description: Canonical tool identifiers for the Agent Toolkit.
// Purpose: Shared tool naming across contracts, runtime, and config.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Canonical tool identifiers exposed to agents and protocol clients.
//! These names are part of the external contract surface.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Canonical tool names for the Agent Toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Create a customer.
    CreateCustomer,
    /// List customers.
    ListCustomers,
    /// Create a product.
    CreateProduct,
    /// List products.
    ListProducts,
    /// Create a price for a product.
    CreatePrice,
    /// List prices.
    ListPrices,
    /// Create a payment link for a price.
    CreatePaymentLink,
    /// Create a draft invoice for a customer.
    CreateInvoice,
    /// List invoices.
    ListInvoices,
    /// Attach an invoice item to an invoice.
    CreateInvoiceItem,
    /// Finalize a draft invoice.
    FinalizeInvoice,
    /// Retrieve the account balance.
    RetrieveBalance,
    /// Refund a payment intent.
    CreateRefund,
    /// List payment intents.
    ListPaymentIntents,
    /// List subscriptions.
    ListSubscriptions,
    /// Cancel a subscription.
    CancelSubscription,
    /// Update a subscription.
    UpdateSubscription,
    /// Search the platform documentation.
    SearchDocumentation,
    /// List coupons.
    ListCoupons,
    /// Create a coupon.
    CreateCoupon,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateCustomer => "create_customer",
            Self::ListCustomers => "list_customers",
            Self::CreateProduct => "create_product",
            Self::ListProducts => "list_products",
            Self::CreatePrice => "create_price",
            Self::ListPrices => "list_prices",
            Self::CreatePaymentLink => "create_payment_link",
            Self::CreateInvoice => "create_invoice",
            Self::ListInvoices => "list_invoices",
            Self::CreateInvoiceItem => "create_invoice_item",
            Self::FinalizeInvoice => "finalize_invoice",
            Self::RetrieveBalance => "retrieve_balance",
            Self::CreateRefund => "create_refund",
            Self::ListPaymentIntents => "list_payment_intents",
            Self::ListSubscriptions => "list_subscriptions",
            Self::CancelSubscription => "cancel_subscription",
            Self::UpdateSubscription => "update_subscription",
            Self::SearchDocumentation => "search_documentation",
            Self::ListCoupons => "list_coupons",
            Self::CreateCoupon => "create_coupon",
        }
    }

    /// Returns all Agent Toolkit tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CreateCustomer,
            Self::ListCustomers,
            Self::CreateProduct,
            Self::ListProducts,
            Self::CreatePrice,
            Self::ListPrices,
            Self::CreatePaymentLink,
            Self::CreateInvoice,
            Self::ListInvoices,
            Self::CreateInvoiceItem,
            Self::FinalizeInvoice,
            Self::RetrieveBalance,
            Self::CreateRefund,
            Self::ListPaymentIntents,
            Self::ListSubscriptions,
            Self::CancelSubscription,
            Self::UpdateSubscription,
            Self::SearchDocumentation,
            Self::ListCoupons,
            Self::CreateCoupon,
        ]
    }

    /// Parses a tool name from its string representation.
    ///
    /// Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "create_customer" => Some(Self::CreateCustomer),
            "list_customers" => Some(Self::ListCustomers),
            "create_product" => Some(Self::CreateProduct),
            "list_products" => Some(Self::ListProducts),
            "create_price" => Some(Self::CreatePrice),
            "list_prices" => Some(Self::ListPrices),
            "create_payment_link" => Some(Self::CreatePaymentLink),
            "create_invoice" => Some(Self::CreateInvoice),
            "list_invoices" => Some(Self::ListInvoices),
            "create_invoice_item" => Some(Self::CreateInvoiceItem),
            "finalize_invoice" => Some(Self::FinalizeInvoice),
            "retrieve_balance" => Some(Self::RetrieveBalance),
            "create_refund" => Some(Self::CreateRefund),
            "list_payment_intents" => Some(Self::ListPaymentIntents),
            "list_subscriptions" => Some(Self::ListSubscriptions),
            "cancel_subscription" => Some(Self::CancelSubscription),
            "update_subscription" => Some(Self::UpdateSubscription),
            "search_documentation" => Some(Self::SearchDocumentation),
            "list_coupons" => Some(Self::ListCoupons),
            "create_coupon" => Some(Self::CreateCoupon),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
