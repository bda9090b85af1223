//! Scenario runner.
//!
//! Runs every selected scenario in sequence. A failing step ends its
//! scenario, is recorded in the outcome, and the run moves on to the next
//! scenario.

use std::path::Path;
use std::time::Instant;

use caliper_domain::{EnvironmentConfig, RunConfig, RunSummary, Scenario, ScenarioOutcome, Step};
use tracing::{debug, error, info, warn};

use super::context::ScenarioContext;
use crate::error::{ScenarioError, ScenarioResult};
use crate::loader::{
    load_dataset, load_environment, load_expected_table, load_scenario, load_schema,
    load_validation_table,
};
use crate::ports::{HttpClient, ProjectSource, ResultsSink};
use crate::template::TemplateEngine;
use crate::validation::{ResponseValidator, assert_status};

/// Drives scenarios through the HTTP client, project source and results
/// sink it is given.
pub struct ScenarioRunner<'a, C, P, R> {
    config: &'a RunConfig,
    client: C,
    project: P,
    results: R,
    engine: TemplateEngine,
    validator: ResponseValidator,
}

impl<'a, C, P, R> ScenarioRunner<'a, C, P, R>
where
    C: HttpClient,
    P: ProjectSource,
    R: ResultsSink,
{
    /// Creates a runner for `config`.
    #[must_use]
    pub fn new(config: &'a RunConfig, client: C, project: P, results: R) -> Self {
        Self {
            config,
            client,
            project,
            results,
            engine: TemplateEngine::new().with_literal_policy(config.literal_policy),
            validator: ResponseValidator::new().with_mode(config.validation_mode),
        }
    }

    /// Runs every scenario selected by the configured tags.
    ///
    /// # Errors
    ///
    /// Returns an error only for run-level failures: the environment config
    /// or the scenarios directory cannot be read, or results cannot be
    /// written. Scenario failures are reported in the summary.
    pub async fn run(&self) -> ScenarioResult<RunSummary> {
        if self.config.clean_results {
            self.results.clean().await?;
        }

        let env_doc = self
            .project
            .read_document(&self.config.env_config_path())
            .await?;
        let env = load_environment(&env_doc, &self.config.environment)?;

        let paths = self
            .project
            .list_scenarios(&self.config.scenarios_dir())
            .await?;
        info!(
            environment = %self.config.environment,
            files = paths.len(),
            "Starting run"
        );

        let mut outcomes = Vec::new();
        for path in &paths {
            let scenario = match self.read_scenario(path).await {
                Ok(scenario) => scenario,
                Err(err) => {
                    error!(path = %path.display(), error = %err, "Failed to load scenario");
                    outcomes.push(ScenarioOutcome {
                        name: path.display().to_string(),
                        passed: false,
                        steps_run: 0,
                        failed_step: None,
                        error: Some(err.to_string()),
                        duration_ms: 0,
                    });
                    continue;
                }
            };

            if !scenario.matches_tags(&self.config.tags) {
                debug!(scenario = %scenario.name, "Skipped by tag filter");
                continue;
            }
            outcomes.push(self.run_scenario(&scenario, &env).await);
        }

        let summary = RunSummary::new(outcomes);
        self.results.finish(self.config, &summary).await?;
        info!(
            passed = summary.passed,
            failed = summary.failed,
            "Run finished"
        );
        Ok(summary)
    }

    /// Runs one scenario with a fresh context.
    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        env: &EnvironmentConfig,
    ) -> ScenarioOutcome {
        info!(scenario = %scenario.name, "Running scenario");
        let started = Instant::now();
        let mut ctx = ScenarioContext::new();
        let mut steps_run = 0;
        let mut failure = None;

        for step in &scenario.steps {
            debug!(step = %step.describe(), "Step");
            match self.run_step(&mut ctx, step, env, &scenario.name).await {
                Ok(()) => steps_run += 1,
                Err(err) => {
                    warn!(
                        scenario = %scenario.name,
                        step = %step.describe(),
                        error = %err,
                        "Scenario failed"
                    );
                    failure = Some((step.describe(), err.to_string()));
                    break;
                }
            }
        }

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let passed = failure.is_none();
        if passed {
            info!(scenario = %scenario.name, duration_ms, "Scenario passed");
        }
        let (failed_step, error) = failure.unzip();
        ScenarioOutcome {
            name: scenario.name.clone(),
            passed,
            steps_run,
            failed_step,
            error,
            duration_ms,
        }
    }

    async fn run_step(
        &self,
        ctx: &mut ScenarioContext,
        step: &Step,
        env: &EnvironmentConfig,
        scenario: &str,
    ) -> ScenarioResult<()> {
        let environment = self.config.environment.as_str();

        match step {
            Step::UseApi { api } => {
                let files = self.config.api_files(api);
                let schema = load_schema(&self.project.read_document(&files.request).await?)?;
                ctx.select_api(api, schema, env, environment)
            }
            Step::SetRequestBody { dataset } => {
                let api = require_api(ctx, step)?;
                let files = self.config.api_files(api);
                let testdata = self.project.read_document(&files.testdata).await?;
                let row = load_dataset(&testdata, dataset)?;
                let expected = load_expected_table(&testdata, dataset)?;
                ctx.apply_dataset(&row, expected, &self.engine, self.config.placeholder_policy)
            }
            Step::Call { method } => {
                let request = ctx.build_request(*method, env, environment)?;
                info!(method = %request.method, url = %request.url, "Calling API");
                let response = self.client.execute(&request).await?;
                info!(
                    status = %response.status,
                    elapsed_ms = response.elapsed_ms(),
                    "Response received"
                );
                debug!(body = %response.body, "Response body");
                self.results
                    .record_exchange(scenario, &request, &response)
                    .await?;
                ctx.set_response(response);
                Ok(())
            }
            Step::ExpectStatus { code } => {
                let response = ctx.response().ok_or_else(|| no_response(step))?;
                assert_status(response.status.as_u16(), *code)?;
                Ok(())
            }
            Step::Validate { column } => {
                let api = require_api(ctx, step)?;
                let response = ctx.response().ok_or_else(|| no_response(step))?;
                let expected = ctx
                    .expected()
                    .ok_or_else(|| ScenarioError::NoDatasetSelected {
                        step: step.describe(),
                    })?;

                let files = self.config.api_files(api);
                let mapping =
                    load_validation_table(&self.project.read_document(&files.validation).await?)?;
                let table = mapping.table(column)?;
                let report = self.validator.run(&response.body, &table, expected);
                info!(
                    column = %column,
                    passed = report.passed(),
                    skipped = report.skipped(),
                    failed = report.failed(),
                    "Response validated"
                );
                for failure in report.failures().skip(1) {
                    warn!(error = %failure, "Additional validation failure");
                }
                report.into_result()?;
                Ok(())
            }
            Step::SaveAccessToken => {
                ctx.save_access_token()?;
                info!("Access token saved");
                Ok(())
            }
        }
    }

    async fn read_scenario(&self, path: &Path) -> ScenarioResult<Scenario> {
        let doc = self.project.read_document(path).await?;
        Ok(load_scenario(&doc)?)
    }
}

fn require_api<'c>(ctx: &'c ScenarioContext, step: &Step) -> ScenarioResult<&'c str> {
    ctx.api().ok_or_else(|| ScenarioError::NoApiSelected {
        step: step.describe(),
    })
}

fn no_response(step: &Step) -> ScenarioError {
    ScenarioError::NoResponse {
        step: step.describe(),
    }
}
