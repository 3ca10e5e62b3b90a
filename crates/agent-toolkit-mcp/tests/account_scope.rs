// crates/agent-toolkit-mcp/tests/account_scope.rs
// ============================================================================
// Module: Account Scope Tests
// Description: Connected-account propagation through handles and metering.
// Purpose: Ensure every remote call carries the session's account scope.
// Dependencies: agent-toolkit-core, agent-toolkit-mcp
// ============================================================================

//! ## Overview
//! Verifies with a recording client that tool calls and meter events issued
//! by an account-scoped session carry that scope, and unscoped sessions
//! carry none.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures use unwraps for clarity."
)]

mod common;

use std::sync::Arc;

use agent_toolkit_core::AccountId;
use agent_toolkit_core::Context;
use agent_toolkit_core::ToolName;
use agent_toolkit_mcp::Catalog;
use agent_toolkit_mcp::MeterEvent;
use agent_toolkit_mcp::PlatformError;
use agent_toolkit_mcp::Toolkit;
use agent_toolkit_mcp::handle::PlatformMethod;
use agent_toolkit_mcp::handle::PlatformPayload;
use agent_toolkit_mcp::metering::METER_EVENTS_PATH;
use common::ForwardingHandler;
use common::RecordingClient;
use common::descriptor;
use common::scoped;
use serde_json::json;

fn forwarding_toolkit(client: &Arc<RecordingClient>, context: Option<Context>) -> Toolkit {
    let catalog = Catalog::new(vec![
        descriptor(ToolName::ListProducts, Arc::new(ForwardingHandler)),
        descriptor(ToolName::ListPrices, Arc::new(ForwardingHandler)),
    ])
    .unwrap();
    Toolkit::with_client(Arc::clone(client) as _, context, &catalog)
}

#[tokio::test]
async fn scoped_session_stamps_account_on_every_call() {
    let client = RecordingClient::replying(json!({}));
    let toolkit = forwarding_toolkit(&client, Some(scoped("acct_123")));
    toolkit.invoke("list_products", json!({})).await.unwrap();
    toolkit.invoke("list_prices", json!({"note": "x"})).await.unwrap();
    let expected = Some(AccountId::new("acct_123").unwrap());
    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.account == expected));
}

#[tokio::test]
async fn unscoped_session_sends_no_account() {
    let client = RecordingClient::replying(json!({}));
    let toolkit = forwarding_toolkit(&client, None);
    toolkit.invoke("list_products", json!({})).await.unwrap();
    assert_eq!(client.only_request().account, None);
    assert!(toolkit.handle().account().is_none());
}

#[tokio::test]
async fn standard_handlers_inherit_account_scope() {
    let client = RecordingClient::replying(json!({"id": "cus_9"}));
    let catalog = Catalog::standard().unwrap();
    let toolkit = Toolkit::with_client(Arc::clone(&client) as _, Some(scoped("acct_9")), &catalog);
    toolkit.invoke("create_customer", json!({"name": "Ada"})).await.unwrap();
    let request = client.only_request();
    assert_eq!(request.account.as_ref().map(AccountId::as_str), Some("acct_9"));
}

#[tokio::test]
async fn meter_events_reuse_the_session_scope() {
    let client = RecordingClient::replying(json!({"object": "billing.meter_event"}));
    let toolkit = forwarding_toolkit(&client, Some(scoped("acct_meter")));
    toolkit.create_meter_event(&MeterEvent::new("api_calls", "cus_1", 42)).await.unwrap();
    let request = client.only_request();
    assert_eq!(request.method, PlatformMethod::Post);
    assert_eq!(request.path, METER_EVENTS_PATH);
    assert_eq!(request.account.as_ref().map(AccountId::as_str), Some("acct_meter"));
    let PlatformPayload::Form(params) = request.payload else {
        unreachable!("meter events are sent as form parameters");
    };
    assert_eq!(params.get("event_name"), Some("api_calls"));
    assert_eq!(params.get("payload[stripe_customer_id]"), Some("cus_1"));
    assert_eq!(params.get("payload[value]"), Some("42"));
}

#[tokio::test]
async fn invalid_meter_events_are_not_sent() {
    let client = RecordingClient::replying(json!({}));
    let toolkit = forwarding_toolkit(&client, None);
    let err = toolkit.create_meter_event(&MeterEvent::new("  ", "cus_1", 1)).await.unwrap_err();
    assert!(matches!(err, PlatformError::InvalidRequest(_)));
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn meter_failures_propagate_to_the_caller() {
    let failure = PlatformError::Transport("connection reset".to_string());
    let client = RecordingClient::failing(failure.clone());
    let toolkit = forwarding_toolkit(&client, None);
    let event = MeterEvent::new("api_calls", "cus_1", 1);
    let err = toolkit.create_meter_event(&event).await.unwrap_err();
    assert_eq!(err, failure);
    assert_eq!(client.requests().len(), 1);
}
