// crates/agent-toolkit-contract/src/tooling.rs
// ============================================================================
// Module: Tool Contracts
// Description: Canonical tool definitions, schemas, and permission gates.
// Purpose: Provide the ordered catalog consumed by the registry and listings.
// Dependencies: agent-toolkit-core, serde_json
// ============================================================================

//! ## Overview
//! This module defines the canonical tool surface. Contracts are
//! context-independent: the same name, schema, and permission apply to every
//! session, and the runtime filters them per session.
//! Security posture: tool inputs are untrusted; schemas reject unknown fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Permission;
use agent_toolkit_core::PermissionAction;
use agent_toolkit_core::Resource;
use agent_toolkit_core::ToolName;
use serde_json::Value;
use serde_json::json;

use crate::types::ToolContract;
use crate::types::ToolDefinition;
use crate::types::ToolExample;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON schema dialect declared by every tool input schema.
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";
/// Maximum page size accepted by list tools.
pub const MAX_LIST_LIMIT: u64 = 100;
/// Subscription statuses accepted by `list_subscriptions`.
const SUBSCRIPTION_STATUSES: [&str; 8] = [
    "active",
    "past_due",
    "unpaid",
    "canceled",
    "incomplete",
    "incomplete_expired",
    "trialing",
    "all",
];
/// Languages accepted by `search_documentation`.
const DOCUMENTATION_LANGUAGES: [&str; 8] =
    ["dotnet", "go", "java", "node", "php", "ruby", "python", "curl"];

// ============================================================================
// SECTION: Tool Contracts
// ============================================================================

/// Returns the canonical tool contracts.
///
/// The order is intentional: registries and listings preserve it so clients
/// see a stable tool order across releases. Append new tools at the end.
#[must_use]
pub fn tool_contracts() -> Vec<ToolContract> {
    vec![
        create_customer_contract(),
        list_customers_contract(),
        create_product_contract(),
        list_products_contract(),
        create_price_contract(),
        list_prices_contract(),
        create_payment_link_contract(),
        create_invoice_contract(),
        list_invoices_contract(),
        create_invoice_item_contract(),
        finalize_invoice_contract(),
        retrieve_balance_contract(),
        create_refund_contract(),
        list_payment_intents_contract(),
        list_subscriptions_contract(),
        cancel_subscription_contract(),
        update_subscription_contract(),
        search_documentation_contract(),
        list_coupons_contract(),
        create_coupon_contract(),
    ]
}

/// Returns the tool definitions for tool listing.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    tool_contracts().iter().map(ToolContract::definition).collect()
}

/// Builds the tool contract for `create_customer`.
fn create_customer_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreateCustomer,
        "Create a customer. Returns the new customer's id.",
        tool_input_schema(
            &json!({
                "name": schema_for_string("The name of the customer."),
                "email": schema_for_string("The email of the customer.")
            }),
            &["name"],
        ),
        Some(Permission::new(Resource::Customers, PermissionAction::Create)),
        vec!["Customer ids are required by invoice and subscription tools.".to_string()],
    )
}

/// Builds the tool contract for `list_customers`.
fn list_customers_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ListCustomers,
        "Fetch a list of customers, optionally filtered by email.",
        tool_input_schema(
            &json!({
                "limit": schema_for_limit(),
                "email": schema_for_string(
                    "A case-sensitive filter on the list based on the customer's email field."
                )
            }),
            &[],
        ),
        Some(Permission::new(Resource::Customers, PermissionAction::Read)),
        vec!["Returns customer ids, names, and emails only.".to_string()],
    )
}

/// Builds the tool contract for `create_product`.
fn create_product_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreateProduct,
        "Create a product. Returns the new product's id.",
        tool_input_schema(
            &json!({
                "name": schema_for_string("The name of the product."),
                "description": schema_for_string("The description of the product.")
            }),
            &["name"],
        ),
        Some(Permission::new(Resource::Products, PermissionAction::Create)),
        vec!["Create a price for the product before selling it.".to_string()],
    )
}

/// Builds the tool contract for `list_products`.
fn list_products_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ListProducts,
        "Fetch a list of products.",
        tool_input_schema(&json!({ "limit": schema_for_limit() }), &[]),
        Some(Permission::new(Resource::Products, PermissionAction::Read)),
        Vec::new(),
    )
}

/// Builds the tool contract for `create_price`.
fn create_price_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreatePrice,
        "Create a price for a product. Returns the new price's id.",
        tool_input_schema(
            &json!({
                "product": schema_for_string("The id of the product to create the price for."),
                "unit_amount": schema_for_amount(
                    "The unit amount of the price in the smallest currency unit."
                ),
                "currency": schema_for_currency()
            }),
            &["product", "unit_amount", "currency"],
        ),
        Some(Permission::new(Resource::Prices, PermissionAction::Create)),
        vec!["Amounts are integers in the smallest currency unit (e.g. cents).".to_string()],
    )
}

/// Builds the tool contract for `list_prices`.
fn list_prices_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ListPrices,
        "Fetch a list of prices, optionally filtered by product.",
        tool_input_schema(
            &json!({
                "product": schema_for_string("The id of the product to list prices for."),
                "limit": schema_for_limit()
            }),
            &[],
        ),
        Some(Permission::new(Resource::Prices, PermissionAction::Read)),
        Vec::new(),
    )
}

/// Builds the tool contract for `create_payment_link`.
fn create_payment_link_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreatePaymentLink,
        "Create a payment link for a price. Returns the link id and url.",
        tool_input_schema(
            &json!({
                "price": schema_for_string("The id of the price to create the payment link for."),
                "quantity": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "The quantity of the product to include."
                }
            }),
            &["price", "quantity"],
        ),
        Some(Permission::new(Resource::PaymentLinks, PermissionAction::Create)),
        vec!["The returned url can be shared directly with the buyer.".to_string()],
    )
}

/// Builds the tool contract for `create_invoice`.
fn create_invoice_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreateInvoice,
        "Create a draft invoice for a customer. Returns the invoice id, hosted url, and status.",
        tool_input_schema(
            &json!({
                "customer": schema_for_string("The id of the customer to create the invoice for."),
                "days_until_due": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "The number of days until the invoice is due."
                }
            }),
            &["customer"],
        ),
        Some(Permission::new(Resource::Invoices, PermissionAction::Create)),
        vec![
            "Invoices are created with collection_method send_invoice.".to_string(),
            "Add invoice items, then finalize the invoice.".to_string(),
        ],
    )
}

/// Builds the tool contract for `list_invoices`.
fn list_invoices_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ListInvoices,
        "Fetch a list of invoices, optionally filtered by customer.",
        tool_input_schema(
            &json!({
                "customer": schema_for_string("The id of the customer to list invoices for."),
                "limit": schema_for_limit()
            }),
            &[],
        ),
        Some(Permission::new(Resource::Invoices, PermissionAction::Read)),
        Vec::new(),
    )
}

/// Builds the tool contract for `create_invoice_item`.
fn create_invoice_item_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreateInvoiceItem,
        "Add a price to a draft invoice as a line item. Returns the invoice item id.",
        tool_input_schema(
            &json!({
                "customer": schema_for_string("The id of the customer the invoice belongs to."),
                "price": schema_for_string("The id of the price for the item."),
                "invoice": schema_for_string("The id of the invoice to add the item to.")
            }),
            &["customer", "price", "invoice"],
        ),
        Some(Permission::new(Resource::InvoiceItems, PermissionAction::Create)),
        vec!["The invoice must still be a draft.".to_string()],
    )
}

/// Builds the tool contract for `finalize_invoice`.
fn finalize_invoice_contract() -> ToolContract {
    build_tool_contract(
        ToolName::FinalizeInvoice,
        "Finalize a draft invoice so it can be paid. Returns the invoice id, hosted url, and \
         status.",
        tool_input_schema(
            &json!({
                "invoice": schema_for_string("The id of the invoice to finalize.")
            }),
            &["invoice"],
        ),
        Some(Permission::new(Resource::Invoices, PermissionAction::Update)),
        Vec::new(),
    )
}

/// Builds the tool contract for `retrieve_balance`.
fn retrieve_balance_contract() -> ToolContract {
    build_tool_contract(
        ToolName::RetrieveBalance,
        "Retrieve the available and pending balance of the account.",
        tool_input_schema(&json!({}), &[]),
        Some(Permission::new(Resource::Balance, PermissionAction::Read)),
        vec!["Scoped to the connected account when one is configured.".to_string()],
    )
}

/// Builds the tool contract for `create_refund`.
fn create_refund_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreateRefund,
        "Refund a payment intent, fully or partially. Returns the refund id.",
        tool_input_schema(
            &json!({
                "payment_intent": schema_for_string("The id of the payment intent to refund."),
                "amount": schema_for_amount(
                    "The amount to refund in the smallest currency unit. Defaults to the full \
                     amount."
                )
            }),
            &["payment_intent"],
        ),
        Some(Permission::new(Resource::Refunds, PermissionAction::Create)),
        vec!["Refunds move money; confirm the amount with the user first.".to_string()],
    )
}

/// Builds the tool contract for `list_payment_intents`.
fn list_payment_intents_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ListPaymentIntents,
        "Fetch a list of payment intents, optionally filtered by customer.",
        tool_input_schema(
            &json!({
                "customer": schema_for_string("The id of the customer to list payment intents for."),
                "limit": schema_for_limit()
            }),
            &[],
        ),
        Some(Permission::new(Resource::PaymentIntents, PermissionAction::Read)),
        Vec::new(),
    )
}

/// Builds the tool contract for `list_subscriptions`.
fn list_subscriptions_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ListSubscriptions,
        "Fetch a list of subscriptions, optionally filtered by customer, price, or status.",
        tool_input_schema(
            &json!({
                "customer": schema_for_string("The id of the customer to list subscriptions for."),
                "price": schema_for_string("The id of the price to list subscriptions for."),
                "status": {
                    "type": "string",
                    "enum": SUBSCRIPTION_STATUSES,
                    "description": "The status of the subscriptions to list."
                },
                "limit": schema_for_limit()
            }),
            &[],
        ),
        Some(Permission::new(Resource::Subscriptions, PermissionAction::Read)),
        vec!["Canceled subscriptions are only returned with status canceled or all.".to_string()],
    )
}

/// Builds the tool contract for `cancel_subscription`.
fn cancel_subscription_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CancelSubscription,
        "Cancel a subscription immediately.",
        tool_input_schema(
            &json!({
                "subscription": schema_for_string("The id of the subscription to cancel.")
            }),
            &["subscription"],
        ),
        Some(Permission::new(Resource::Subscriptions, PermissionAction::Update)),
        vec!["Cancellation cannot be undone.".to_string()],
    )
}

/// Builds the tool contract for `update_subscription`.
fn update_subscription_contract() -> ToolContract {
    build_tool_contract(
        ToolName::UpdateSubscription,
        "Update a subscription's items or proration behavior.",
        tool_input_schema(
            &json!({
                "subscription": schema_for_string("The id of the subscription to update."),
                "proration_behavior": {
                    "type": "string",
                    "enum": ["create_prorations", "none", "always_invoice"],
                    "description": "How to handle prorations when the items change."
                },
                "items": {
                    "type": "array",
                    "description": "Subscription items to add, update, or remove.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": schema_for_string("The id of an existing subscription item."),
                            "price": schema_for_string("The id of the price for the item."),
                            "quantity": {
                                "type": "integer",
                                "minimum": 1,
                                "description": "The quantity of the item."
                            },
                            "deleted": {
                                "type": "boolean",
                                "description": "Remove the item from the subscription."
                            }
                        },
                        "additionalProperties": false
                    }
                }
            }),
            &["subscription"],
        ),
        Some(Permission::new(Resource::Subscriptions, PermissionAction::Update)),
        vec!["Use list_subscriptions to discover existing item ids.".to_string()],
    )
}

/// Builds the tool contract for `search_documentation`.
fn search_documentation_contract() -> ToolContract {
    build_tool_contract(
        ToolName::SearchDocumentation,
        "Search the platform knowledge base for answers to integration questions.",
        tool_input_schema(
            &json!({
                "question": schema_for_string("The user question to search the documentation for."),
                "language": {
                    "type": "string",
                    "enum": DOCUMENTATION_LANGUAGES,
                    "description": "The programming language to prefer in code samples."
                }
            }),
            &["question"],
        ),
        None,
        vec!["Requires no permission; it reads public documentation only.".to_string()],
    )
}

/// Builds the tool contract for `list_coupons`.
fn list_coupons_contract() -> ToolContract {
    build_tool_contract(
        ToolName::ListCoupons,
        "Fetch a list of coupons.",
        tool_input_schema(&json!({ "limit": schema_for_limit() }), &[]),
        Some(Permission::new(Resource::Coupons, PermissionAction::Read)),
        Vec::new(),
    )
}

/// Builds the tool contract for `create_coupon`.
fn create_coupon_contract() -> ToolContract {
    build_tool_contract(
        ToolName::CreateCoupon,
        "Create a percentage or fixed-amount coupon. Returns the coupon id.",
        with_discount_rules(tool_input_schema(
            &json!({
                "name": schema_for_string("The name of the coupon shown to customers."),
                "percent_off": {
                    "type": "number",
                    "exclusiveMinimum": 0,
                    "maximum": 100,
                    "description": "The percentage discount. Exclusive with amount_off."
                },
                "amount_off": schema_for_amount(
                    "The fixed discount in the smallest currency unit. Requires currency."
                ),
                "currency": schema_for_currency(),
                "duration": {
                    "type": "string",
                    "enum": ["once", "repeating", "forever"],
                    "description": "How long the discount applies."
                },
                "duration_in_months": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of months the discount applies when repeating."
                }
            }),
            &["name"],
        )),
        Some(Permission::new(Resource::Coupons, PermissionAction::Create)),
        vec!["Provide exactly one of percent_off or amount_off.".to_string()],
    )
}

// ============================================================================
// SECTION: Examples
// ============================================================================

/// Return example payloads for a tool.
fn tool_examples(tool_name: ToolName) -> Vec<ToolExample> {
    let (description, input) = match tool_name {
        ToolName::CreateCustomer => (
            "Create a customer with an email.",
            json!({ "name": "Jenny Rosen", "email": "jenny@example.com" }),
        ),
        ToolName::ListCustomers => ("List the first ten customers.", json!({ "limit": 10 })),
        ToolName::CreateProduct => (
            "Create a product with a description.",
            json!({ "name": "Premium plan", "description": "Monthly premium access." }),
        ),
        ToolName::ListProducts => ("List products.", json!({ "limit": 5 })),
        ToolName::CreatePrice => (
            "Create a ten dollar price.",
            json!({ "product": "prod_123", "unit_amount": 1000, "currency": "usd" }),
        ),
        ToolName::ListPrices => ("List prices for a product.", json!({ "product": "prod_123" })),
        ToolName::CreatePaymentLink => {
            ("Create a payment link for one unit.", json!({ "price": "price_123", "quantity": 1 }))
        }
        ToolName::CreateInvoice => (
            "Create an invoice due in thirty days.",
            json!({ "customer": "cus_123", "days_until_due": 30 }),
        ),
        ToolName::ListInvoices => ("List a customer's invoices.", json!({ "customer": "cus_123" })),
        ToolName::CreateInvoiceItem => (
            "Add a price to a draft invoice.",
            json!({ "customer": "cus_123", "price": "price_123", "invoice": "in_123" }),
        ),
        ToolName::FinalizeInvoice => ("Finalize a draft invoice.", json!({ "invoice": "in_123" })),
        ToolName::RetrieveBalance => ("Retrieve the balance.", json!({})),
        ToolName::CreateRefund => (
            "Refund part of a payment.",
            json!({ "payment_intent": "pi_123", "amount": 500 }),
        ),
        ToolName::ListPaymentIntents => {
            ("List a customer's payment intents.", json!({ "customer": "cus_123", "limit": 3 }))
        }
        ToolName::ListSubscriptions => {
            ("List active subscriptions.", json!({ "customer": "cus_123", "status": "active" }))
        }
        ToolName::CancelSubscription => {
            ("Cancel a subscription.", json!({ "subscription": "sub_123" }))
        }
        ToolName::UpdateSubscription => (
            "Swap the price on a subscription item.",
            json!({
                "subscription": "sub_123",
                "proration_behavior": "create_prorations",
                "items": [{ "id": "si_123", "price": "price_456", "quantity": 2 }]
            }),
        ),
        ToolName::SearchDocumentation => (
            "Ask how to create a checkout session.",
            json!({ "question": "How do I create a checkout session?", "language": "node" }),
        ),
        ToolName::ListCoupons => ("List coupons.", json!({ "limit": 10 })),
        ToolName::CreateCoupon => (
            "Create a repeating percentage coupon.",
            json!({
                "name": "Spring sale",
                "percent_off": 25,
                "duration": "repeating",
                "duration_in_months": 3
            }),
        ),
    };
    vec![ToolExample {
        description: description.to_string(),
        input,
    }]
}

// ============================================================================
// SECTION: Schema Helpers (Local)
// ============================================================================

/// Builds a contract with examples resolved from the tool name.
fn build_tool_contract(
    name: ToolName,
    description: &str,
    input_schema: Value,
    required_permission: Option<Permission>,
    notes: Vec<String>,
) -> ToolContract {
    ToolContract {
        name,
        description: description.to_string(),
        input_schema,
        required_permission,
        examples: tool_examples(name),
        notes,
    }
}

/// Builds a standard closed object input schema.
#[must_use]
fn tool_input_schema(properties: &Value, required: &[&str]) -> Value {
    json!({
        "$schema": SCHEMA_DIALECT,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Adds the coupon discount rules: exactly one discount kind, and a currency
/// for fixed amounts.
fn with_discount_rules(mut schema: Value) -> Value {
    if let Some(object) = schema.as_object_mut() {
        object.insert(
            "oneOf".to_string(),
            json!([{ "required": ["percent_off"] }, { "required": ["amount_off"] }]),
        );
        object.insert("dependentRequired".to_string(), json!({ "amount_off": ["currency"] }));
    }
    schema
}

/// Returns a JSON schema for non-empty strings.
#[must_use]
fn schema_for_string(description: &str) -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "description": description
    })
}

/// Returns a JSON schema for list page sizes.
#[must_use]
fn schema_for_limit() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_LIST_LIMIT,
        "description": "A limit on the number of objects to be returned. Limit can range \
                        between 1 and 100."
    })
}

/// Returns a JSON schema for amounts in the smallest currency unit.
#[must_use]
fn schema_for_amount(description: &str) -> Value {
    json!({
        "type": "integer",
        "minimum": 0,
        "description": description
    })
}

/// Returns a JSON schema for three-letter ISO currency codes.
#[must_use]
fn schema_for_currency() -> Value {
    json!({
        "type": "string",
        "pattern": "^[a-z]{3}$",
        "description": "Three-letter ISO currency code, in lowercase."
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
