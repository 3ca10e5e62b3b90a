// crates/agent-toolkit-mcp/src/lib.rs
// ============================================================================
// Module: Agent Toolkit MCP
// Description: Capability registry, dispatcher, and MCP server.
// Purpose: Expose payment-platform operations as permission-filtered tools.
// Dependencies: agent-toolkit-core, agent-toolkit-contract, axum, reqwest, tokio
// ============================================================================

//! ## Overview
//! Agent Toolkit MCP turns the static tool catalog into a session: the
//! catalog is filtered by the caller's permissions into a
//! [`CapabilityRegistry`], tools are invoked by name through [`dispatch`],
//! and handlers reach the remote platform only through an account-scoped
//! [`CapabilityHandle`]. [`Toolkit`] is the library entry point and
//! [`McpServer`] exposes the same session over JSON-RPC.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod handle;
pub mod handlers;
pub mod metering;
pub mod registry;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod tools;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ToolAuditSink;
pub use auth::DefaultToolAuthz;
pub use auth::RequestContext;
pub use auth::ToolAuthz;
pub use catalog::CapabilityDescriptor;
pub use catalog::CapabilityHandler;
pub use catalog::Catalog;
pub use catalog::CatalogError;
pub use client::HttpPlatformClient;
pub use client::PlatformSettings;
pub use handle::CapabilityHandle;
pub use handle::FormParams;
pub use handle::PlatformClient;
pub use handle::PlatformError;
pub use handle::PlatformRequest;
pub use metering::MeterEvent;
pub use registry::CapabilityRegistry;
pub use server::McpServer;
pub use server::McpServerError;
pub use session::Toolkit;
pub use session::ToolkitBuilder;
pub use session::ToolkitError;
pub use telemetry::NoopMetrics;
pub use telemetry::ToolMetrics;
pub use tools::ToolError;
pub use tools::ToolRouter;
pub use tools::dispatch;
