// crates/agent-toolkit-mcp/src/handlers/documentation.rs
// ============================================================================
// Module: Documentation Handlers
// Description: Query the public documentation search endpoint.
// Purpose: Back the ungated `search_documentation` tool.
// Dependencies: async-trait, serde, serde_json
// ============================================================================

//! ## Overview
//! Documentation search is the only tool without a required permission. The
//! request goes to the documentation endpoint as JSON and carries no platform
//! credential; only the `sources` array of the answer is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use agent_toolkit_core::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

use super::decode;
use crate::catalog::CapabilityHandler;
use crate::handle::CapabilityHandle;
use crate::handle::PlatformError;

/// Arguments for `search_documentation`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchDocumentationRequest {
    /// Natural-language question.
    question: String,
    /// Preferred code sample language.
    language: Option<String>,
}

/// Handler for `search_documentation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchDocumentation;

#[async_trait]
impl CapabilityHandler for SearchDocumentation {
    async fn execute(
        &self,
        handle: &CapabilityHandle,
        _context: &Context,
        args: Value,
    ) -> Result<Value, PlatformError> {
        let request: SearchDocumentationRequest = decode(args)?;
        let mut body = json!({ "query": request.question });
        if let (Some(language), Some(object)) = (request.language, body.as_object_mut()) {
            object.insert("language".to_string(), Value::String(language));
        }
        let answer = handle.search_documentation(body).await?;
        Ok(answer.get("sources").cloned().unwrap_or_else(|| Value::Array(Vec::new())))
    }
}
