//! Validation dispatch: one response, one table, one set of expected values.

use caliper_domain::{
    AssertionError, AssertionResult, ExpectedValues, MatchRule, RowOutcome, RowVerdict,
    ValidationMode, ValidationReport, ValidationRow, ValidationTable,
};
use serde_json::Value;
use tracing::debug;

use super::strategy::{check_contains, check_exact, check_regex};
use crate::path::resolve;

/// Runs validation tables against decoded response bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator {
    mode: ValidationMode,
}

impl ResponseValidator {
    /// Creates a fail-fast validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the validation mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Evaluates every row of `table` and records each outcome.
    ///
    /// Rows without an expected value are skipped. In fail-fast mode the
    /// report ends at the first failure.
    #[must_use]
    pub fn run(
        &self,
        response: &Value,
        table: &ValidationTable,
        expected: &ExpectedValues,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        for row in table.rows() {
            let verdict = match expected.get(&row.label) {
                None => {
                    debug!(label = %row.label, "No expected value, skipping row");
                    RowVerdict::Skipped
                }
                Some(want) => match check_row(response, row, want) {
                    Ok(()) => RowVerdict::Passed,
                    Err(err) => {
                        debug!(label = %row.label, error = %err, "Validation row failed");
                        RowVerdict::Failed(err)
                    }
                },
            };

            let failed = matches!(verdict, RowVerdict::Failed(_));
            report.outcomes.push(RowOutcome {
                label: row.label.clone(),
                rule: row.rule,
                verdict,
            });
            if failed && self.mode == ValidationMode::FailFast {
                break;
            }
        }

        debug!(
            table = table.name(),
            passed = report.passed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Validation finished"
        );
        report
    }

    /// Like [`run`](Self::run), but turns the first failure into an error.
    ///
    /// # Errors
    ///
    /// Returns the first failing row's `AssertionError`.
    pub fn validate(
        &self,
        response: &Value,
        table: &ValidationTable,
        expected: &ExpectedValues,
    ) -> AssertionResult<ValidationReport> {
        self.run(response, table, expected).into_result()
    }
}

/// Applies one row's strategy to the value its path selects.
///
/// # Errors
///
/// Returns `AssertionError::Path` if the path cannot be evaluated, or the
/// strategy's failure.
pub fn check_row(response: &Value, row: &ValidationRow, expected: &Value) -> AssertionResult<()> {
    let actual = resolve(response, &row.path)
        .map_err(|source| AssertionError::Path {
            label: row.label.clone(),
            source,
        })?
        .into_value();

    match row.rule {
        MatchRule::Exact => check_exact(&row.label, &row.path, &actual, expected),
        MatchRule::Contains => check_contains(&row.label, &row.path, &actual, expected),
        MatchRule::Regex => check_regex(&row.label, &actual, expected),
    }
}

/// Validates `response` with a fail-fast [`ResponseValidator`].
///
/// # Errors
///
/// Returns the first failing row's `AssertionError`.
pub fn validate(
    response: &Value,
    table: &ValidationTable,
    expected: &ExpectedValues,
) -> AssertionResult<ValidationReport> {
    ResponseValidator::new().validate(response, table, expected)
}

/// Compares a response status code with the expected one.
///
/// # Errors
///
/// Returns `AssertionError::StatusCodeMismatch` if they differ.
pub const fn assert_status(actual: u16, expected: u16) -> AssertionResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::StatusCodeMismatch { expected, actual })
    }
}
