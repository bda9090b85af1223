//! Run configuration.
//!
//! A [`RunConfig`] is built once at process start and passed by reference to
//! every collaborator. Nothing mutates it afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::validation::ValidationMode;

/// Default directory for request/response attachments and run summaries.
pub const DEFAULT_RESULTS_DIR: &str = "caliper-results";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// What to do with placeholders whose key is missing from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderPolicy {
    /// Drop the field and log a warning.
    #[default]
    Lenient,
    /// Fail the step.
    Strict,
}

/// Treatment of literal (non-placeholder) scalars in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LiteralPolicy {
    /// Literal scalars are not carried into the payload.
    #[default]
    Drop,
    /// Literal scalars are copied into the payload unchanged.
    Keep,
}

/// Process-wide run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Project directory holding `config/`, `apischema/` and `scenarios/`.
    pub project_dir: PathBuf,
    /// Environment name (`dev`, `qa`, ...).
    pub environment: String,
    /// Tag filter; empty runs every scenario.
    pub tags: Vec<String>,
    /// Where attachments and summaries are written.
    pub results_dir: PathBuf,
    /// Whether to empty the results directory before the run.
    pub clean_results: bool,
    /// Handling of unresolved placeholders.
    pub placeholder_policy: PlaceholderPolicy,
    /// Handling of literal schema values.
    pub literal_policy: LiteralPolicy,
    /// Fail-fast or collect-all validation.
    pub validation_mode: ValidationMode,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl RunConfig {
    /// Creates a configuration with defaults for everything but the project
    /// directory and environment.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
            environment: environment.into(),
            tags: Vec::new(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            clean_results: true,
            placeholder_policy: PlaceholderPolicy::default(),
            literal_policy: LiteralPolicy::default(),
            validation_mode: ValidationMode::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the tag filter (builder pattern).
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the results directory (builder pattern).
    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// `<project>/config/envconfig.yml`
    #[must_use]
    pub fn env_config_path(&self) -> PathBuf {
        self.project_dir.join("config").join("envconfig.yml")
    }

    /// `<project>/scenarios`
    #[must_use]
    pub fn scenarios_dir(&self) -> PathBuf {
        self.project_dir.join("scenarios")
    }

    /// `<project>/apischema/<env>/<api>`
    #[must_use]
    pub fn api_dir(&self, api: &str) -> PathBuf {
        self.project_dir
            .join("apischema")
            .join(&self.environment)
            .join(api)
    }

    /// Source file locations for an API.
    #[must_use]
    pub fn api_files(&self, api: &str) -> ApiFiles {
        ApiFiles::in_dir(&self.api_dir(api))
    }
}

/// Source files belonging to one API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFiles {
    /// `request.json`
    pub request: PathBuf,
    /// `testdata.yml`
    pub testdata: PathBuf,
    /// `validation_mapping.yml`
    pub validation: PathBuf,
}

impl ApiFiles {
    fn in_dir(dir: &Path) -> Self {
        Self {
            request: dir.join("request.json"),
            testdata: dir.join("testdata.yml"),
            validation: dir.join("validation_mapping.yml"),
        }
    }
}

/// One environment entry of `envconfig.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Base URI for regular APIs.
    pub host_uri: String,
    /// Base URI for the token API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    /// OAuth2 client id.
    #[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth2 client secret.
    #[serde(
        rename = "clientSecret",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_secret: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_files_layout() {
        let config = RunConfig::new("/work/app", "dev");
        let files = config.api_files("create_user");
        assert_eq!(
            files.request,
            PathBuf::from("/work/app/apischema/dev/create_user/request.json")
        );
        assert_eq!(
            files.validation,
            PathBuf::from("/work/app/apischema/dev/create_user/validation_mapping.yml")
        );
        assert_eq!(
            config.env_config_path(),
            PathBuf::from("/work/app/config/envconfig.yml")
        );
    }

    #[test]
    fn test_environment_config_keys() {
        let yaml = "host_uri: https://api.test\ntoken_uri: https://auth.test/token\nclientId: abc\nclientSecret: s3cret\n";
        let env: EnvironmentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(env.client_id.as_deref(), Some("abc"));
        assert_eq!(env.token_uri.as_deref(), Some("https://auth.test/token"));
    }
}
