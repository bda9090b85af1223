//! Match strategies: exact, contains and regex.

use caliper_domain::value::{stringify, unwrap_single};
use caliper_domain::{AssertionError, AssertionResult};
use regex::Regex;
use serde_json::Value;

/// Shown in place of a per-column field that does not exist.
const MISSING_FIELD: &str = "<missing>";

/// String-cast equality.
///
/// A one-element array is unwrapped first, and a string containing both
/// `\r` and `\n` has every carriage return and newline removed.
pub(crate) fn check_exact(
    label: &str,
    path: &str,
    actual: &Value,
    expected: &Value,
) -> AssertionResult<()> {
    let actual = unwrap_single(actual);
    let mut actual_str = stringify(actual);
    if actual.is_string() && actual_str.contains('\r') && actual_str.contains('\n') {
        actual_str = actual_str.replace(['\r', '\n'], "");
    }
    let expected_str = stringify(expected);

    if actual_str == expected_str {
        Ok(())
    } else {
        Err(AssertionError::ValueMismatch {
            label: label.to_string(),
            path: path.to_string(),
            expected: expected_str,
            actual: actual_str,
        })
    }
}

/// Containment of every comma-separated token, or of the whole expected value.
pub(crate) fn check_contains(
    label: &str,
    path: &str,
    actual: &Value,
    expected: &Value,
) -> AssertionResult<()> {
    let missing = |token: &str| AssertionError::Containment {
        label: label.to_string(),
        path: path.to_string(),
        missing: token.to_string(),
        actual: stringify(actual),
    };

    match expected {
        Value::String(tokens) if tokens.contains(',') => {
            for token in tokens.split(',').map(str::trim) {
                if !contains_token(actual, token) {
                    return Err(missing(token));
                }
            }
            Ok(())
        }
        _ => {
            let needle = stringify(expected);
            if stringify(actual).contains(&needle) {
                Ok(())
            } else {
                Err(missing(&needle))
            }
        }
    }
}

fn contains_token(actual: &Value, token: &str) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| stringify(item) == token),
        Value::Object(map) => map.contains_key(token),
        other => stringify(other).contains(token),
    }
}

/// Regex matching anchored at the start of the value.
///
/// With an array actual and a comma-separated expected value, each pattern
/// is matched against the same-index field of every element. Otherwise the
/// whole expected value is one pattern, matched against every element of a
/// non-empty array or against the value itself.
pub(crate) fn check_regex(label: &str, actual: &Value, expected: &Value) -> AssertionResult<()> {
    let expected = stringify(expected);

    match actual {
        Value::Array(items) if expected.contains(',') => {
            let patterns = expected
                .split(',')
                .map(|p| compile(label, p).map(|re| (p, re)))
                .collect::<AssertionResult<Vec<_>>>()?;
            for item in items {
                for (index, (pattern, re)) in patterns.iter().enumerate() {
                    let cell = field(item, index).map(stringify);
                    let value = cell.as_deref().unwrap_or(MISSING_FIELD);
                    if cell.is_none() || !re.is_match(value) {
                        return Err(mismatch(label, pattern, value));
                    }
                }
            }
            Ok(())
        }
        Value::Array(items) if !items.is_empty() => {
            let re = compile(label, &expected)?;
            for item in items {
                let value = stringify(item);
                if !re.is_match(&value) {
                    return Err(mismatch(label, &expected, &value));
                }
            }
            Ok(())
        }
        other => {
            let re = compile(label, &expected)?;
            let value = stringify(other);
            if re.is_match(&value) {
                Ok(())
            } else {
                Err(mismatch(label, &expected, &value))
            }
        }
    }
}

fn field(item: &Value, index: usize) -> Option<&Value> {
    match item {
        Value::Array(fields) => fields.get(index),
        Value::Object(map) => map.values().nth(index),
        scalar if index == 0 => Some(scalar),
        _ => None,
    }
}

fn compile(label: &str, pattern: &str) -> AssertionResult<Regex> {
    Regex::new(&format!(r"\A(?:{pattern})")).map_err(|e| AssertionError::InvalidPattern {
        label: label.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn mismatch(label: &str, pattern: &str, value: &str) -> AssertionError {
    AssertionError::PatternMismatch {
        label: label.to_string(),
        pattern: pattern.to_string(),
        value: value.to_string(),
    }
}
