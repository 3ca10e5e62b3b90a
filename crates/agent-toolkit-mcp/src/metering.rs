// crates/agent-toolkit-mcp/src/metering.rs
// ============================================================================
// Module: Usage Metering
// Description: Billing meter events recorded through the capability handle.
// Purpose: Report usage on behalf of a customer, outside the tool catalog.
// Dependencies: agent-toolkit-core, serde
// ============================================================================

//! ## Overview
//! Meter events are a side channel: they are not tools and are never listed,
//! but they reuse the session's [`CapabilityHandle`] so they inherit the same
//! credential and connected-account scope. Failures propagate to the caller
//! and are never retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::handle::CapabilityHandle;
use crate::handle::FormParams;
use crate::handle::PlatformError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// API path for billing meter events.
pub const METER_EVENTS_PATH: &str = "/v1/billing/meter_events";
/// Maximum length of meter event and customer identifiers.
const MAX_METER_FIELD_LENGTH: usize = 255;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A usage record for a billing meter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeterEvent {
    /// Meter event name.
    pub event: String,
    /// Customer the usage is billed to.
    pub customer: String,
    /// Usage quantity.
    pub value: u64,
}

impl MeterEvent {
    /// Creates a meter event.
    #[must_use]
    pub fn new(event: impl Into<String>, customer: impl Into<String>, value: u64) -> Self {
        Self {
            event: event.into(),
            customer: customer.into(),
            value,
        }
    }

    /// Validates the event before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidRequest`] for blank or oversized
    /// identifiers.
    pub fn validate(&self) -> Result<(), PlatformError> {
        validate_field("event", &self.event)?;
        validate_field("customer", &self.customer)
    }
}

// ============================================================================
// SECTION: Recording
// ============================================================================

/// Records a meter event through the handle.
///
/// # Errors
///
/// Returns [`PlatformError`] when validation or the remote call fails.
pub async fn record_meter_event(
    handle: &CapabilityHandle,
    event: &MeterEvent,
) -> Result<(), PlatformError> {
    event.validate()?;
    let params = FormParams::new()
        .with("event_name", &event.event)
        .with("payload[stripe_customer_id]", &event.customer)
        .with("payload[value]", event.value);
    handle.post(METER_EVENTS_PATH, params).await?;
    Ok(())
}

/// Rejects blank or oversized meter identifiers.
fn validate_field(field: &str, value: &str) -> Result<(), PlatformError> {
    if value.trim().is_empty() {
        return Err(PlatformError::InvalidRequest(format!("meter {field} must be non-empty")));
    }
    if value.len() > MAX_METER_FIELD_LENGTH {
        return Err(PlatformError::InvalidRequest(format!("meter {field} exceeds max length")));
    }
    Ok(())
}
