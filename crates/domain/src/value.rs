//! String-casting of JSON values.
//!
//! Expected values come from YAML test data and actual values from JSON
//! responses, so comparisons happen on a common string form.

use serde_json::Value;

/// Casts a JSON value to the string form used by every comparison.
///
/// Strings are returned without quotes, `null` becomes `"null"`, and
/// numbers, booleans and containers use their compact JSON rendering.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unwraps a one-element array to its only element.
///
/// Any other value is returned as is.
#[must_use]
pub fn unwrap_single(value: &Value) -> &Value {
    match value {
        Value::Array(items) if items.len() == 1 => &items[0],
        other => other,
    }
}
