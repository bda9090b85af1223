//! Application error types

use caliper_domain::AssertionError;
use thiserror::Error;

use crate::loader::SourceError;
use crate::ports::{HttpClientError, ReportError};
use crate::template::TemplateError;

/// Errors that abort a scenario, or the run when raised outside one.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A project document could not be read or interpreted.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Placeholders stayed unresolved under the strict policy.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An assertion on the response failed.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// The HTTP call failed before a response arrived.
    #[error(transparent)]
    Http(#[from] HttpClientError),

    /// Results could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// A step needs an API but no `use_api` step ran before it.
    #[error("step '{step}' requires an API; add a use_api step first")]
    NoApiSelected {
        /// The step that failed.
        step: String,
    },

    /// A step needs a dataset but no `set_request_body` step ran before it.
    #[error("step '{step}' requires a dataset; add a set_request_body step first")]
    NoDatasetSelected {
        /// The step that failed.
        step: String,
    },

    /// A step needs a response but no call has been made.
    #[error("step '{step}' requires a response; add a call step first")]
    NoResponse {
        /// The step that failed.
        step: String,
    },

    /// The response body has no string `access_token`.
    #[error("response has no access_token")]
    MissingAccessToken,

    /// The environment lacks a setting the token API needs.
    #[error("environment '{environment}' has no {setting}")]
    MissingEnvironmentSetting {
        /// Selected environment.
        environment: String,
        /// Missing key.
        setting: &'static str,
    },
}

/// Result type alias for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_message_is_forwarded() {
        let err = ScenarioError::from(AssertionError::StatusCodeMismatch {
            expected: 201,
            actual: 400,
        });
        assert_eq!(
            err.to_string(),
            "status code mismatch: Expected: 201, but got: 400"
        );
    }

    #[test]
    fn test_missing_setting_message() {
        let err = ScenarioError::MissingEnvironmentSetting {
            environment: "qa".to_string(),
            setting: "token_uri",
        };
        assert_eq!(err.to_string(), "environment 'qa' has no token_uri");
    }
}
