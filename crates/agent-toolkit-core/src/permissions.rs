// crates/agent-toolkit-core/src/permissions.rs
// ============================================================================
// Module: Permission Model
// Description: Resource/action permissions gating tool availability.
// Purpose: Provide strict, fail-closed parsing of `resource:action` grants.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Permissions are written as `resource:action` strings (for example
//! `customers:read`). A tool declares at most one required [`Permission`];
//! a session grants a [`PermissionSet`]. Parsing is exact and case-sensitive,
//! and unknown resources or actions are rejected rather than ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Resources and Actions
// ============================================================================

/// Platform resource families that can be permission-gated.
///
/// # Invariants
/// - String forms are stable and appear verbatim in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    /// Customer records.
    Customers,
    /// Catalog products.
    Products,
    /// Product prices.
    Prices,
    /// Hosted payment links.
    PaymentLinks,
    /// Invoices.
    Invoices,
    /// Invoice line items.
    InvoiceItems,
    /// Account balance.
    Balance,
    /// Refunds.
    Refunds,
    /// Payment intents.
    PaymentIntents,
    /// Subscriptions.
    Subscriptions,
    /// Coupons.
    Coupons,
}

impl Resource {
    /// Returns the canonical string label for the resource.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Products => "products",
            Self::Prices => "prices",
            Self::PaymentLinks => "payment_links",
            Self::Invoices => "invoices",
            Self::InvoiceItems => "invoice_items",
            Self::Balance => "balance",
            Self::Refunds => "refunds",
            Self::PaymentIntents => "payment_intents",
            Self::Subscriptions => "subscriptions",
            Self::Coupons => "coupons",
        }
    }

    /// Parses a resource label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "customers" => Some(Self::Customers),
            "products" => Some(Self::Products),
            "prices" => Some(Self::Prices),
            "payment_links" => Some(Self::PaymentLinks),
            "invoices" => Some(Self::Invoices),
            "invoice_items" => Some(Self::InvoiceItems),
            "balance" => Some(Self::Balance),
            "refunds" => Some(Self::Refunds),
            "payment_intents" => Some(Self::PaymentIntents),
            "subscriptions" => Some(Self::Subscriptions),
            "coupons" => Some(Self::Coupons),
            _ => None,
        }
    }
}

/// Operation class applied to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionAction {
    /// Create new records.
    Create,
    /// Read or list records.
    Read,
    /// Mutate or cancel existing records.
    Update,
}

impl PermissionAction {
    /// Returns the canonical string label for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
        }
    }

    /// Parses an action label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "create" => Some(Self::Create),
            "read" => Some(Self::Read),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Permission
// ============================================================================

/// A single `resource:action` grant.
///
/// # Invariants
/// - Wire form is exactly `<resource>:<action>` with canonical labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    /// Resource family.
    resource: Resource,
    /// Operation class.
    action: PermissionAction,
}

impl Permission {
    /// Creates a permission from its parts.
    #[must_use]
    pub const fn new(resource: Resource, action: PermissionAction) -> Self {
        Self {
            resource,
            action,
        }
    }

    /// Returns the resource family.
    #[must_use]
    pub const fn resource(self) -> Resource {
        self.resource
    }

    /// Returns the operation class.
    #[must_use]
    pub const fn action(self) -> PermissionAction {
        self.action
    }

    /// Parses a `resource:action` permission string.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when the string is malformed or names an
    /// unknown resource or action.
    pub fn parse(value: &str) -> Result<Self, PermissionError> {
        let (resource, action) =
            value.split_once(':').ok_or_else(|| PermissionError::Malformed(value.to_string()))?;
        let resource = Resource::parse(resource)
            .ok_or_else(|| PermissionError::UnknownResource(resource.to_string()))?;
        let action = PermissionAction::parse(action)
            .ok_or_else(|| PermissionError::UnknownAction(action.to_string()))?;
        Ok(Self::new(resource, action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.resource.as_str(), self.action.as_str())
    }
}

impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.to_string()
    }
}

// ============================================================================
// SECTION: Permission Set
// ============================================================================

/// Set of granted permissions for a session.
///
/// # Invariants
/// - Ordered and deduplicated; iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parses a list of permission strings.
    ///
    /// # Errors
    ///
    /// Returns the first [`PermissionError`] encountered; partial sets are
    /// never returned.
    pub fn parse_all<I, S>(values: I) -> Result<Self, PermissionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for value in values {
            set.insert(Permission::parse(value.as_ref())?);
        }
        Ok(Self(set))
    }

    /// Returns true when the permission is granted.
    #[must_use]
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Returns the number of granted permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no permissions are granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates granted permissions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Permission parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// Permission string is not of the form `resource:action`.
    #[error("malformed permission `{0}` (expected resource:action)")]
    Malformed(String),
    /// Resource label is not recognized.
    #[error("unknown permission resource `{0}`")]
    UnknownResource(String),
    /// Action label is not recognized.
    #[error("unknown permission action `{0}`")]
    UnknownAction(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only permission parsing assertions."
    )]

    use super::Permission;
    use super::PermissionAction;
    use super::PermissionError;
    use super::PermissionSet;
    use super::Resource;

    #[test]
    fn parse_accepts_canonical_labels() {
        let permission = Permission::parse("payment_links:create").unwrap();
        assert_eq!(permission.resource(), Resource::PaymentLinks);
        assert_eq!(permission.action(), PermissionAction::Create);
        assert_eq!(permission.to_string(), "payment_links:create");
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            Permission::parse("Customers:read"),
            Err(PermissionError::UnknownResource("Customers".to_string()))
        );
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert_eq!(
            Permission::parse("customers"),
            Err(PermissionError::Malformed("customers".to_string()))
        );
    }

    #[test]
    fn parse_rejects_unknown_action() {
        assert_eq!(
            Permission::parse("customers:delete"),
            Err(PermissionError::UnknownAction("delete".to_string()))
        );
    }

    #[test]
    fn parse_all_fails_on_first_invalid_entry() {
        let result = PermissionSet::parse_all(["customers:read", "bogus:read"]);
        assert_eq!(result, Err(PermissionError::UnknownResource("bogus".to_string())));
    }

    #[test]
    fn permission_set_deduplicates() {
        let set = PermissionSet::parse_all(["customers:read", "customers:read"]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(Permission::new(Resource::Customers, PermissionAction::Read)));
    }

    #[test]
    fn permission_set_deserializes_from_string_list() {
        let set: PermissionSet =
            serde_json::from_str(r#"["invoices:update", "balance:read"]"#).expect("parse set");
        let labels: Vec<String> = set.iter().map(|permission| permission.to_string()).collect();
        assert_eq!(labels, vec!["invoices:update".to_string(), "balance:read".to_string()]);
    }
}
