//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The validation mode name is unknown.
    #[error("unknown validation mode: {0}")]
    UnknownValidationMode(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures raised while evaluating a path expression against a response tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The expression could not be parsed.
    #[error("invalid path expression '{expression}': {reason}")]
    Syntax {
        /// The offending expression.
        expression: String,
        /// What went wrong.
        reason: String,
    },

    /// The expression is well formed but matched nothing.
    #[error("path '{expression}' not found in response")]
    NotFound {
        /// The expression that matched nothing.
        expression: String,
    },
}

/// Assertion failures surfaced to the scenario runner.
///
/// Every message states the expected and the actual value verbatim so a
/// failure can be diagnosed without re-running the scenario.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssertionError {
    /// The response status code differs from the expected one.
    #[error("status code mismatch: Expected: {expected}, but got: {actual}")]
    StatusCodeMismatch {
        /// Expected status code.
        expected: u16,
        /// Status code received.
        actual: u16,
    },

    /// Exact comparison failed.
    #[error("[{label}] value mismatch at '{path}': Expected: {expected}, but got: {actual}")]
    ValueMismatch {
        /// Validation row label.
        label: String,
        /// Path expression of the row.
        path: String,
        /// Expected value, string-cast.
        expected: String,
        /// Actual value, string-cast.
        actual: String,
    },

    /// A contains check could not find one of the expected tokens.
    #[error("[{label}] containment failed at '{path}': Expected: {missing}, but got: {actual}")]
    Containment {
        /// Validation row label.
        label: String,
        /// Path expression of the row.
        path: String,
        /// The token that was not found.
        missing: String,
        /// Actual value, string-cast.
        actual: String,
    },

    /// A regex check did not match.
    #[error("[{label}] Regular Exp: {pattern} did not match: {value}")]
    PatternMismatch {
        /// Validation row label.
        label: String,
        /// Pattern that failed.
        pattern: String,
        /// Value it was matched against.
        value: String,
    },

    /// The expected value of a regex row is not a valid pattern.
    #[error("[{label}] invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Validation row label.
        label: String,
        /// The pattern as written.
        pattern: String,
        /// Compiler error.
        reason: String,
    },

    /// The row's path expression could not be evaluated.
    #[error("[{label}] {source}")]
    Path {
        /// Validation row label.
        label: String,
        /// Underlying path failure.
        #[source]
        source: PathError,
    },
}

impl AssertionError {
    /// Returns the validation row label this failure belongs to, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::StatusCodeMismatch { .. } => None,
            Self::ValueMismatch { label, .. }
            | Self::Containment { label, .. }
            | Self::PatternMismatch { label, .. }
            | Self::InvalidPattern { label, .. }
            | Self::Path { label, .. } => Some(label),
        }
    }
}

/// Result type alias for assertions.
pub type AssertionResult<T> = Result<T, AssertionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_expected_and_actual() {
        let err = AssertionError::ValueMismatch {
            label: "Exact_id".to_string(),
            path: "id".to_string(),
            expected: "200".to_string(),
            actual: "201".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Expected: 200"));
        assert!(message.contains("but got: 201"));
        assert_eq!(err.label(), Some("Exact_id"));
    }

    #[test]
    fn test_status_code_has_no_label() {
        let err = AssertionError::StatusCodeMismatch {
            expected: 200,
            actual: 404,
        };
        assert_eq!(err.label(), None);
        assert_eq!(
            err.to_string(),
            "status code mismatch: Expected: 200, but got: 404"
        );
    }
}
