// crates/agent-toolkit-mcp/tests/handlers.rs
// ============================================================================
// Module: Capability Handler Tests
// Description: Request shapes and result projections of standard handlers.
// Purpose: Ensure each handler maps validated arguments onto one API call.
// Dependencies: agent-toolkit-mcp, serde_json
// ============================================================================

//! ## Overview
//! Drives the standard catalog through a recording client and checks the
//! method, path, and parameters of each issued request, plus the fields
//! returned to the caller.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only fixtures use unwraps and panics for clarity."
)]

mod common;

use std::sync::Arc;

use agent_toolkit_core::ToolName;
use agent_toolkit_mcp::Catalog;
use agent_toolkit_mcp::PlatformError;
use agent_toolkit_mcp::ToolError;
use agent_toolkit_mcp::Toolkit;
use agent_toolkit_mcp::handle::PlatformMethod;
use agent_toolkit_mcp::handle::PlatformPayload;
use agent_toolkit_mcp::handle::PlatformRequest;
use agent_toolkit_mcp::handle::PlatformTarget;
use common::RecordingClient;
use serde_json::Value;
use serde_json::json;

fn standard_toolkit(client: &Arc<RecordingClient>) -> Toolkit {
    Toolkit::with_client(Arc::clone(client) as _, None, &Catalog::standard().unwrap())
}

async fn call(reply: Value, name: &str, args: Value) -> (Value, PlatformRequest) {
    let client = RecordingClient::replying(reply);
    let toolkit = standard_toolkit(&client);
    let output = toolkit.invoke(name, args).await.unwrap();
    (serde_json::from_str(&output).unwrap(), client.only_request())
}

fn form(request: &PlatformRequest, key: &str) -> Option<String> {
    match &request.payload {
        PlatformPayload::Form(params) => params.get(key).map(str::to_string),
        PlatformPayload::Json(_) => panic!("expected form payload"),
    }
}

#[tokio::test]
async fn create_customer_posts_form_and_returns_id() {
    let reply = json!({"id": "cus_1", "object": "customer", "name": "Ada"});
    let (output, request) =
        call(reply, "create_customer", json!({"name": "Ada", "email": "ada@example.com"})).await;
    assert_eq!(output, json!({"id": "cus_1"}));
    assert_eq!(request.method, PlatformMethod::Post);
    assert_eq!(request.target, PlatformTarget::Api);
    assert_eq!(request.path, "/v1/customers");
    assert_eq!(form(&request, "name").as_deref(), Some("Ada"));
    assert_eq!(form(&request, "email").as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn list_customers_projects_summary_fields() {
    let reply = json!({
        "object": "list",
        "data": [
            {"id": "cus_1", "name": "Ada", "email": "ada@example.com", "balance": 0},
            {"id": "cus_2", "name": "Lin"}
        ]
    });
    let (output, request) = call(reply, "list_customers", json!({"limit": 2})).await;
    assert_eq!(
        output,
        json!([
            {"id": "cus_1", "name": "Ada", "email": "ada@example.com"},
            {"id": "cus_2", "name": "Lin", "email": null}
        ])
    );
    assert_eq!(request.method, PlatformMethod::Get);
    assert_eq!(form(&request, "limit").as_deref(), Some("2"));
}

#[tokio::test]
async fn create_payment_link_uses_bracketed_line_items() {
    let reply = json!({"id": "plink_1", "url": "https://buy.example/abc", "active": true});
    let (output, request) =
        call(reply, "create_payment_link", json!({"price": "price_1", "quantity": 3})).await;
    assert_eq!(output, json!({"id": "plink_1", "url": "https://buy.example/abc"}));
    assert_eq!(request.path, "/v1/payment_links");
    assert_eq!(form(&request, "line_items[0][price]").as_deref(), Some("price_1"));
    assert_eq!(form(&request, "line_items[0][quantity]").as_deref(), Some("3"));
}

#[tokio::test]
async fn create_invoice_sends_invoice_collection() {
    let reply = json!({
        "id": "in_1",
        "hosted_invoice_url": "https://pay.example/in_1",
        "customer": "cus_1",
        "status": "draft"
    });
    let (output, request) =
        call(reply, "create_invoice", json!({"customer": "cus_1", "days_until_due": 7})).await;
    assert_eq!(
        output,
        json!({
            "id": "in_1",
            "url": "https://pay.example/in_1",
            "customer": "cus_1",
            "status": "draft"
        })
    );
    assert_eq!(form(&request, "collection_method").as_deref(), Some("send_invoice"));
    assert_eq!(form(&request, "days_until_due").as_deref(), Some("7"));
}

#[tokio::test]
async fn finalize_invoice_interpolates_checked_identifier() {
    let reply = json!({"id": "in_1", "hosted_invoice_url": null, "status": "open"});
    let (_, request) = call(reply, "finalize_invoice", json!({"invoice": "in_1"})).await;
    assert_eq!(request.method, PlatformMethod::Post);
    assert_eq!(request.path, "/v1/invoices/in_1/finalize");
}

#[tokio::test]
async fn path_identifiers_with_separators_are_rejected_before_sending() {
    let client = RecordingClient::replying(json!({}));
    let toolkit = standard_toolkit(&client);
    let err = toolkit
        .invoke("cancel_subscription", json!({"subscription": "../v1/customers"}))
        .await
        .unwrap_err();
    match err {
        ToolError::CapabilityExecution {
            name,
            source: PlatformError::InvalidRequest(_),
        } => assert_eq!(name, ToolName::CancelSubscription),
        other => panic!("unexpected error: {other}"),
    }
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn cancel_subscription_issues_delete() {
    let reply = json!({"id": "sub_1", "status": "canceled"});
    let args = json!({"subscription": "sub_1"});
    let (output, request) = call(reply, "cancel_subscription", args).await;
    assert_eq!(output["status"], "canceled");
    assert_eq!(request.method, PlatformMethod::Delete);
    assert_eq!(request.path, "/v1/subscriptions/sub_1");
}

#[tokio::test]
async fn update_subscription_flattens_items() {
    let args = json!({
        "subscription": "sub_1",
        "proration_behavior": "none",
        "items": [
            {"id": "si_1", "deleted": true},
            {"price": "price_2", "quantity": 2}
        ]
    });
    let (_, request) = call(json!({"id": "sub_1"}), "update_subscription", args).await;
    assert_eq!(request.path, "/v1/subscriptions/sub_1");
    assert_eq!(form(&request, "proration_behavior").as_deref(), Some("none"));
    assert_eq!(form(&request, "items[0][id]").as_deref(), Some("si_1"));
    assert_eq!(form(&request, "items[0][deleted]").as_deref(), Some("true"));
    assert_eq!(form(&request, "items[1][price]").as_deref(), Some("price_2"));
    assert_eq!(form(&request, "items[1][quantity]").as_deref(), Some("2"));
    assert_eq!(form(&request, "items[0][price]"), None);
}

#[tokio::test]
async fn create_refund_returns_status_and_amount() {
    let reply = json!({"id": "re_1", "status": "succeeded", "amount": 500, "charge": "ch_1"});
    let (output, request) =
        call(reply, "create_refund", json!({"payment_intent": "pi_1", "amount": 500})).await;
    assert_eq!(output, json!({"id": "re_1", "status": "succeeded", "amount": 500}));
    assert_eq!(form(&request, "payment_intent").as_deref(), Some("pi_1"));
}

#[tokio::test]
async fn retrieve_balance_gets_without_parameters() {
    let reply = json!({"object": "balance", "available": []});
    let (output, request) = call(reply.clone(), "retrieve_balance", json!({})).await;
    assert_eq!(output, reply);
    assert_eq!(request.method, PlatformMethod::Get);
    assert_eq!(request.path, "/v1/balance");
    assert_eq!(request.payload, PlatformPayload::Form(agent_toolkit_mcp::FormParams::new()));
}

#[tokio::test]
async fn create_coupon_sends_percent_discount() {
    let args = json!({"name": "Launch", "percent_off": 12.5, "duration": "once"});
    let (output, request) = call(json!({"id": "co_1"}), "create_coupon", args).await;
    assert_eq!(output, json!({"id": "co_1"}));
    assert_eq!(form(&request, "percent_off").as_deref(), Some("12.5"));
    assert_eq!(form(&request, "amount_off"), None);
}

#[tokio::test]
async fn create_coupon_rejects_both_discount_kinds() {
    let client = RecordingClient::replying(json!({}));
    let toolkit = standard_toolkit(&client);
    let args = json!({"name": "Both", "percent_off": 10, "amount_off": 100, "currency": "usd"});
    let err = toolkit.invoke("create_coupon", args).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments { .. }));
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn search_documentation_posts_json_and_returns_sources() {
    let reply = json!({"sources": [{"title": "Refunds", "url": "https://docs.example/refunds"}]});
    let args = json!({"question": "How do refunds work?", "language": "python"});
    let (output, request) = call(reply, "search_documentation", args).await;
    assert_eq!(output, json!([{"title": "Refunds", "url": "https://docs.example/refunds"}]));
    assert_eq!(request.target, PlatformTarget::DocumentationSearch);
    assert_eq!(
        request.payload,
        PlatformPayload::Json(json!({"query": "How do refunds work?", "language": "python"}))
    );
}

#[tokio::test]
async fn search_documentation_without_sources_returns_empty_list() {
    let (output, _) =
        call(json!({}), "search_documentation", json!({"question": "anything"})).await;
    assert_eq!(output, json!([]));
}

#[tokio::test]
async fn remote_rejections_are_wrapped_unchanged() {
    let rejection = PlatformError::Api {
        status: 429,
        code: Some("rate_limit".to_string()),
        message: "Too many requests".to_string(),
    };
    let client = RecordingClient::failing(rejection.clone());
    let toolkit = Toolkit::with_client(client, None, &Catalog::standard().unwrap());
    let err = toolkit.invoke("list_products", json!({})).await.unwrap_err();
    assert_eq!(
        err,
        ToolError::CapabilityExecution {
            name: ToolName::ListProducts,
            source: rejection,
        }
    );
}
