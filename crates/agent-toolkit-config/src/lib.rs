// crates/agent-toolkit-config/src/lib.rs
// ============================================================================
// Module: Agent Toolkit Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for agent-toolkit.toml semantics.
// Dependencies: agent-toolkit-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `agent-toolkit-config` defines the configuration model for the Agent
//! Toolkit. It provides strict, fail-closed validation and converts the
//! `[toolkit]` section into an immutable [`agent_toolkit_core::Context`].
//!
//! Security posture: config inputs are untrusted. Secret keys are never read
//! from the config file; only the name of the environment variable holding
//! the key is configured.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
