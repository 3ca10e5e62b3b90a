// crates/agent-toolkit-mcp/src/handlers/balance.rs
// ============================================================================
// Module: Balance Handlers
// Description: Retrieve the account balance.
// Purpose: Back the `retrieve_balance` tool.
// Dependencies: async-trait, serde_json
// ============================================================================

//! ## Overview
//! Returns the balance object unchanged; the tool accepts no arguments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::decode;
use crate::catalog::CapabilityHandler;
use crate::handle::CapabilityHandle;
use crate::handle::FormParams;
use crate::handle::PlatformError;

/// Arguments for `retrieve_balance`; the tool takes none.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RetrieveBalanceRequest {}

/// Handler for `retrieve_balance`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrieveBalance;

#[async_trait]
impl CapabilityHandler for RetrieveBalance {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let RetrieveBalanceRequest {} = decode(args)?;
        handle.get("/v1/balance", FormParams::new()).await
    }
}
