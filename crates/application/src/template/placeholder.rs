//! Placeholder tokens of the form `(param_name)`.
//!
//! A schema leaf is a placeholder when the whole string is wrapped in the
//! marker characters; there is no interpolation inside longer strings.

use serde_json::Value;

/// Opening marker character.
pub const OPEN: char = '(';

/// Closing marker character.
pub const CLOSE: char = ')';

/// Returns the parameter name if `token` is a placeholder.
///
/// # Examples
///
/// ```
/// use caliper_application::template::placeholder::placeholder_name;
///
/// assert_eq!(placeholder_name("(user_id)"), Some("user_id"));
/// assert_eq!(placeholder_name("user_id"), None);
/// assert_eq!(placeholder_name("call (555)"), None);
/// ```
#[must_use]
pub fn placeholder_name(token: &str) -> Option<&str> {
    token.strip_prefix(OPEN)?.strip_suffix(CLOSE)
}

/// Returns the parameter name if `value` is a placeholder string.
#[must_use]
pub fn as_placeholder(value: &Value) -> Option<&str> {
    value.as_str().and_then(placeholder_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_placeholder_name() {
        assert_eq!(placeholder_name("(a)"), Some("a"));
        assert_eq!(placeholder_name("()"), Some(""));
        assert_eq!(placeholder_name("("), None);
        assert_eq!(placeholder_name(")"), None);
        assert_eq!(placeholder_name("(a"), None);
        assert_eq!(placeholder_name("x(a)"), None);
    }

    #[test]
    fn test_non_strings_are_not_placeholders() {
        assert_eq!(as_placeholder(&json!(1)), None);
        assert_eq!(as_placeholder(&json!(null)), None);
        assert_eq!(as_placeholder(&json!("(id)")), Some("id"));
    }
}
