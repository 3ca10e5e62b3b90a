// crates/agent-toolkit-core/src/context.rs
// ============================================================================
// Module: Session Context
// Description: Immutable per-session configuration for tool dispatch.
// Purpose: Carry mode, permission grants, and account scoping to every call.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Context`] is built once when a session starts and is never mutated.
//! Derived state (the tool registry and the capability handle) is rebuilt
//! from a new context rather than patched.
//!
//! - `mode` only affects client identification metadata.
//! - `permissions` absent means every tool is available; present-but-empty
//!   means only tools without a required permission are available.
//! - `account` scopes every remote call to a connected account.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::permissions::Permission;
use crate::permissions::PermissionSet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a connected account identifier in bytes.
pub const MAX_ACCOUNT_ID_LENGTH: usize = 255;

// ============================================================================
// SECTION: Mode
// ============================================================================

/// Operating mode of the session.
///
/// # Invariants
/// - Never affects which tools are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Embedded toolkit used directly by an agent framework.
    #[default]
    #[serde(rename = "toolkit")]
    Toolkit,
    /// Model Context Protocol server.
    #[serde(rename = "modelcontextprotocol")]
    ModelContextProtocol,
}

impl Mode {
    /// Returns the canonical string label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toolkit => "toolkit",
            Self::ModelContextProtocol => "modelcontextprotocol",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Account Identifier
// ============================================================================

/// Connected account identifier used to scope remote calls.
///
/// # Invariants
/// - Non-empty, at most [`MAX_ACCOUNT_ID_LENGTH`] bytes.
/// - Contains no whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Creates a validated account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InvalidAccount`] when the identifier is empty,
    /// too long, or contains whitespace/control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, ContextError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ContextError::InvalidAccount("account id must be non-empty".to_string()));
        }
        if id.len() > MAX_ACCOUNT_ID_LENGTH {
            return Err(ContextError::InvalidAccount("account id exceeds max length".to_string()));
        }
        if id.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
            return Err(ContextError::InvalidAccount(
                "account id must not contain whitespace or control characters".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ContextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Immutable session configuration.
///
/// # Invariants
/// - Fields are private and have no mutators.
/// - `Context::default()` is unrestricted, unscoped, toolkit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Operating mode.
    mode: Mode,
    /// Granted permissions; `None` means unrestricted.
    permissions: Option<PermissionSet>,
    /// Connected account scope.
    account: Option<AccountId>,
}

impl Context {
    /// Creates a context from its parts.
    #[must_use]
    pub const fn new(
        mode: Mode,
        permissions: Option<PermissionSet>,
        account: Option<AccountId>,
    ) -> Self {
        Self {
            mode,
            permissions,
            account,
        }
    }

    /// Returns the operating mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the granted permissions, if restricted.
    #[must_use]
    pub const fn permissions(&self) -> Option<&PermissionSet> {
        self.permissions.as_ref()
    }

    /// Returns the connected account scope, if any.
    #[must_use]
    pub const fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    /// Returns true when a tool requiring `required` is available.
    ///
    /// A tool is available when it requires nothing, when the context is
    /// unrestricted, or when the requirement is granted.
    #[must_use]
    pub fn permits(&self, required: Option<Permission>) -> bool {
        match (required, &self.permissions) {
            (None, _) | (Some(_), None) => true,
            (Some(permission), Some(granted)) => granted.contains(permission),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Context construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Account identifier failed validation.
    #[error("invalid account: {0}")]
    InvalidAccount(String),
}
