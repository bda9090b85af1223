//! Caliper - data-driven API test harness.
//!
//! Wires the file system project source, the reqwest HTTP client and the
//! results directory into the scenario runner.

pub mod cli;

use caliper_application::{ScenarioResult, ScenarioRunner};
use caliper_domain::{RunConfig, RunSummary};
use caliper_infrastructure::{FileSystemProject, ReqwestHttpClient, ResultsDir};

pub use cli::Cli;

/// Runs every selected scenario of the project described by `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the run cannot
/// start or finish. Failing scenarios are reported in the summary.
pub async fn run(config: &RunConfig) -> ScenarioResult<RunSummary> {
    let client = ReqwestHttpClient::new(config.timeout_ms)?;
    let results = ResultsDir::new(config.results_dir.clone()).protect(config.project_dir.clone());

    ScenarioRunner::new(config, client, FileSystemProject::new(), results)
        .run()
        .await
}

/// Formats the end-of-run report printed to stdout.
#[must_use]
pub fn render_summary(summary: &RunSummary) -> String {
    let mut lines = Vec::new();
    for scenario in &summary.scenarios {
        let verdict = if scenario.passed { "PASS" } else { "FAIL" };
        lines.push(format!("{verdict}  {} ({} ms)", scenario.name, scenario.duration_ms));
        if let Some(step) = &scenario.failed_step {
            lines.push(format!("      step: {step}"));
        }
        if let Some(error) = &scenario.error {
            lines.push(format!("      {error}"));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "{} scenarios: {} passed, {} failed",
        summary.scenarios.len(),
        summary.passed,
        summary.failed
    ));
    lines.join("\n")
}
