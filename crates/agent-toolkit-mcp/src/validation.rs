// crates/agent-toolkit-mcp/src/validation.rs
// ============================================================================
// Module: Argument Validation
// Description: Compiled JSON schema validation for tool arguments.
// Purpose: Reject malformed payloads before any handler or remote call runs.
// Dependencies: jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! An [`ArgumentValidator`] is compiled once per catalog entry. Validation
//! reports the first offending field so callers can correct a single input
//! at a time. Checks run in a fixed order: object shape, missing required
//! fields, unknown fields, per-field schemas, then whole-payload rules such as
//! `oneOf` that do not belong to any single field.
//! Security posture: tool arguments are untrusted; unknown fields fail closed
//! when the schema is closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field label used for whole-payload failures.
pub const ARGUMENTS_FIELD: &str = "arguments";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Argument validation failure naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument `{field}`: {reason}")]
pub struct ArgumentError {
    /// Offending field, or `arguments` for whole-payload failures.
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ArgumentError {
    /// Builds an argument error.
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Compiled validator for one tool input schema.
pub struct ArgumentValidator {
    /// Required top-level fields in schema order.
    required: Vec<String>,
    /// True when the schema sets `additionalProperties: false`.
    closed: bool,
    /// Per-field validators keyed by property name.
    properties: BTreeMap<String, Validator>,
    /// Validator for the full schema.
    full: Validator,
}

impl ArgumentValidator {
    /// Compiles a validator from a tool input schema.
    ///
    /// # Errors
    ///
    /// Returns a description of the defect when the schema is not an object
    /// schema or fails to compile.
    pub fn compile(schema: &Value) -> Result<Self, String> {
        let object = schema.as_object().ok_or_else(|| "schema must be an object".to_string())?;
        if object.get("type").and_then(Value::as_str) != Some("object") {
            return Err("schema type must be object".to_string());
        }
        let full = compile_schema(schema)?;
        let required = match object.get("required") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| "required entries must be strings".to_string())
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err("required must be an array".to_string()),
        };
        let mut properties = BTreeMap::new();
        match object.get("properties") {
            None => {}
            Some(Value::Object(map)) => {
                for (name, subschema) in map {
                    let validator = compile_schema(subschema)
                        .map_err(|err| format!("property `{name}`: {err}"))?;
                    properties.insert(name.clone(), validator);
                }
            }
            Some(_) => return Err("properties must be an object".to_string()),
        }
        let closed = object.get("additionalProperties") == Some(&Value::Bool(false));
        Ok(Self {
            required,
            closed,
            properties,
            full,
        })
    }

    /// Validates a tool argument payload.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError`] naming the first offending field.
    pub fn validate(&self, args: &Value) -> Result<(), ArgumentError> {
        let Some(object) = args.as_object() else {
            return Err(ArgumentError::new(ARGUMENTS_FIELD, "arguments must be a JSON object"));
        };
        if let Some(missing) = self.required.iter().find(|name| !object.contains_key(*name)) {
            return Err(ArgumentError::new(missing.as_str(), "required field is missing"));
        }
        if self.closed
            && let Some(unknown) = object.keys().find(|name| !self.properties.contains_key(*name))
        {
            return Err(ArgumentError::new(unknown.as_str(), "unknown field"));
        }
        for (name, value) in object {
            if let Some(validator) = self.properties.get(name)
                && let Some(error) = validator.iter_errors(value).next()
            {
                return Err(ArgumentError::new(name.as_str(), error.to_string()));
            }
        }
        if let Some(error) = self.full.iter_errors(args).next() {
            return Err(ArgumentError::new(ARGUMENTS_FIELD, error.to_string()));
        }
        Ok(())
    }
}

/// Compiles a schema with the workspace draft.
fn compile_schema(schema: &Value) -> Result<Validator, String> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only validation assertions."
    )]

    use serde_json::json;

    use super::ARGUMENTS_FIELD;
    use super::ArgumentValidator;

    fn customer_validator() -> ArgumentValidator {
        ArgumentValidator::compile(&json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "limit": { "type": "integer", "minimum": 1, "maximum": 100 }
            },
            "required": ["name"],
            "additionalProperties": false
        }))
        .unwrap()
    }

    #[test]
    fn missing_required_field_is_named() {
        let err = customer_validator().validate(&json!({ "limit": 3 })).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn unknown_field_is_named() {
        let err = customer_validator().validate(&json!({ "name": "a", "extra": 1 })).unwrap_err();
        assert_eq!(err.field, "extra");
        assert_eq!(err.reason, "unknown field");
    }

    #[test]
    fn wrong_type_is_named() {
        let err = customer_validator().validate(&json!({ "name": 42 })).unwrap_err();
        assert_eq!(err.field, "name");
        let err = customer_validator().validate(&json!({ "name": "a", "limit": 500 })).unwrap_err();
        assert_eq!(err.field, "limit");
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = customer_validator().validate(&json!(["name"])).unwrap_err();
        assert_eq!(err.field, ARGUMENTS_FIELD);
    }

    #[test]
    fn whole_payload_rules_report_arguments() {
        let validator = ArgumentValidator::compile(&json!({
            "type": "object",
            "properties": {
                "a": { "type": "integer" },
                "b": { "type": "integer" }
            },
            "oneOf": [{ "required": ["a"] }, { "required": ["b"] }],
            "additionalProperties": false
        }))
        .unwrap();
        assert!(validator.validate(&json!({ "a": 1 })).is_ok());
        let err = validator.validate(&json!({ "a": 1, "b": 2 })).unwrap_err();
        assert_eq!(err.field, ARGUMENTS_FIELD);
    }

    #[test]
    fn malformed_schemas_fail_to_compile() {
        assert!(ArgumentValidator::compile(&json!("object")).is_err());
        assert!(ArgumentValidator::compile(&json!({ "type": "array" })).is_err());
        assert!(
            ArgumentValidator::compile(&json!({
                "type": "object",
                "properties": { "a": { "type": 42 } }
            }))
            .is_err()
        );
    }
}
