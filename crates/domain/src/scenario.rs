//! Scenario definitions and verdicts.
//!
//! Scenarios are structured YAML documents: a name, optional tags and an
//! ordered list of steps.

use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;

/// A scenario loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Name of the scenario.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags used for selection (`Smoke`, `Regression`, ...).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Steps executed in order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Returns true if the scenario should run for the requested tags.
    ///
    /// An empty filter selects everything; otherwise any shared tag selects
    /// the scenario. Tags compare case-sensitively and ignore a leading `@`.
    #[must_use]
    pub fn matches_tags(&self, filter: &[String]) -> bool {
        if filter.is_empty() {
            return true;
        }
        let strip = |t: &str| t.trim().trim_start_matches('@').to_string();
        self.tags
            .iter()
            .map(|t| strip(t))
            .any(|tag| filter.iter().any(|f| strip(f) == tag))
    }
}

/// A single scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Select an API and load its schema, clearing the previous API's state.
    UseApi {
        /// API directory name under `apischema/<env>/`.
        api: String,
    },
    /// Select a dataset and resolve the body and query templates with it.
    SetRequestBody {
        /// Dataset name in `testdata.yml`.
        dataset: String,
    },
    /// Issue the HTTP call.
    Call {
        /// HTTP method.
        method: HttpMethod,
    },
    /// Assert the status code of the last response.
    ExpectStatus {
        /// Expected status code.
        code: u16,
    },
    /// Validate the last response against a validation column.
    Validate {
        /// Column name in `validation_mapping.yml`.
        column: String,
    },
    /// Store `access_token` from the last response for bearer auth.
    SaveAccessToken,
}

impl Step {
    /// Short description for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::UseApi { api } => format!("use api \"{api}\""),
            Self::SetRequestBody { dataset } => format!("set request body for \"{dataset}\""),
            Self::Call { method } => format!("call method \"{method}\""),
            Self::ExpectStatus { code } => format!("expect status {code}"),
            Self::Validate { column } => format!("validate \"{column}\""),
            Self::SaveAccessToken => "save access token".to_string(),
        }
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub name: String,
    /// Whether every step succeeded.
    pub passed: bool,
    /// Number of steps completed.
    pub steps_run: usize,
    /// Failing step description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
    /// Failure message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time in milliseconds.
    pub duration_ms: u64,
}

/// Aggregate of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunSummary {
    /// Outcomes in execution order.
    pub scenarios: Vec<ScenarioOutcome>,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
}

impl RunSummary {
    /// Builds a summary from outcomes.
    #[must_use]
    pub fn new(scenarios: Vec<ScenarioOutcome>) -> Self {
        let passed = scenarios.iter().filter(|s| s.passed).count();
        let failed = scenarios.len() - passed;
        Self {
            scenarios,
            passed,
            failed,
        }
    }

    /// Returns true if no scenario failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
