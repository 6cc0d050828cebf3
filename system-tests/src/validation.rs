// system-tests/src/validation.rs
// ============================================================================
// Module: Response Validation
// Description: Field presence and type checks over JSON response bodies.
// Purpose: Report every structural mismatch in a response at once.
// Dependencies: content-gate-client, serde_json
// ============================================================================

//! Collects field-level mismatches between a response body and expected fields.

use std::fmt;

use content_gate_client::ApiResponse;
use serde_json::Value;

/// Expected shape of one response field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldExpectation {
    /// JSON string.
    String,
    /// JSON integer (booleans rejected).
    Int,
    /// JSON boolean.
    Bool,
    /// JSON array.
    List,
    /// JSON object.
    Dict,
    /// Present with any value.
    Exists,
    /// Equal to a specific value.
    Equals(Value),
}

impl fmt::Display for FieldExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Int => f.write_str("int"),
            Self::Bool => f.write_str("bool"),
            Self::List => f.write_str("list"),
            Self::Dict => f.write_str("dict"),
            Self::Exists => f.write_str("present"),
            Self::Equals(value) => write!(f, "{}", render(value)),
        }
    }
}

/// Returns the type name used in validation messages.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Renders strings bare and other values as compact JSON.
fn render(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}

/// Checks `body` against expectations and returns one message per mismatch.
#[must_use]
pub fn validate_response_structure(
    body: &Value,
    expected: &[(&str, FieldExpectation)],
) -> Vec<String> {
    let mut errors = Vec::new();
    for (field, expectation) in expected {
        let Some(actual) = body.get(*field) else {
            errors.push(format!("Missing field: {field}"));
            continue;
        };
        let matches = match expectation {
            FieldExpectation::String => actual.is_string(),
            FieldExpectation::Int => actual.is_i64() || actual.is_u64(),
            FieldExpectation::Bool => actual.is_boolean(),
            FieldExpectation::List => actual.is_array(),
            FieldExpectation::Dict => actual.is_object(),
            FieldExpectation::Exists => true,
            FieldExpectation::Equals(value) => actual == value,
        };
        if matches {
            continue;
        }
        let message = match expectation {
            FieldExpectation::Equals(_) => {
                format!("Field {field} should be {expectation}, got {}", render(actual))
            }
            _ => format!("Field {field} should be {expectation}, got {}", type_name(actual)),
        };
        errors.push(message);
    }
    errors
}

/// Formats a scenario test name as `test_<scenario>_<kind>`.
#[must_use]
pub fn format_test_name(scenario: &str, kind: &str) -> String {
    format!("test_{scenario}_{kind}")
}

/// Fails with a readable message unless the status is one of `accepted`.
///
/// # Errors
///
/// Returns a message naming the accepted statuses and the response body.
pub fn assert_status_in(response: &ApiResponse, accepted: &[u16]) -> Result<(), String> {
    response.expect_status_in(accepted).map(|_| ()).map_err(|err| err.to_string())
}

/// Fails with every structural mismatch joined into one message.
///
/// # Errors
///
/// Returns the joined mismatch messages when any expectation fails.
pub fn assert_structure(body: &Value, expected: &[(&str, FieldExpectation)]) -> Result<(), String> {
    let errors = validate_response_structure(body, expected);
    if errors.is_empty() { Ok(()) } else { Err(errors.join("; ")) }
}
