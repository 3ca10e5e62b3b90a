// crates/agent-toolkit-core/src/lib.rs
// ============================================================================
// Module: Agent Toolkit Core Library
// Description: Public API surface for the Agent Toolkit core identifiers.
// Purpose: Expose tool names, permissions, and session context types.
// Dependencies: crate::{context, permissions, tooling}
// ============================================================================

//! ## Overview
//! Agent Toolkit core defines the vocabulary shared by the contract catalog,
//! the configuration loader, and the runtime dispatcher: canonical tool names,
//! the `resource:action` permission model, and the immutable session
//! [`Context`]. The crate performs no I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod permissions;
pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::AccountId;
pub use context::Context;
pub use context::ContextError;
pub use context::Mode;
pub use permissions::Permission;
pub use permissions::PermissionAction;
pub use permissions::PermissionError;
pub use permissions::PermissionSet;
pub use permissions::Resource;
pub use tooling::ToolName;
