//! Validation tables and verdicts.
//!
//! A validation table pairs row labels with path expressions into the
//! response. The label also selects the match strategy; that choice is made
//! once, when the row is built, and carried as a [`MatchRule`].

use serde::{Deserialize, Serialize};

use crate::error::{AssertionError, DomainError, DomainResult};

/// Match strategy applied to a validation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// String-cast equality.
    #[default]
    Exact,
    /// Substring or element containment.
    Contains,
    /// Regular expression anchored at the start of the value.
    Regex,
}

impl MatchRule {
    /// Classifies a row by its label.
    ///
    /// A label containing `Contains` selects containment, one containing
    /// `Regex` selects regex matching, anything else is exact. `Contains` is
    /// checked first.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.contains("Contains") {
            Self::Contains
        } else if label.contains("Regex") {
            Self::Regex
        } else {
            Self::Exact
        }
    }

    /// Returns a short name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Contains => "contains",
            Self::Regex => "regex",
        }
    }
}

/// One row of a validation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRow {
    /// Row label, also the key into the expected values.
    pub label: String,
    /// Path expression into the response tree.
    pub path: String,
    /// Strategy chosen from the label.
    pub rule: MatchRule,
}

impl ValidationRow {
    /// Creates a row, classifying it from its label.
    #[must_use]
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        let label = label.into();
        let rule = MatchRule::from_label(&label);
        Self {
            label,
            path: path.into(),
            rule,
        }
    }
}

/// Ordered validation rows for one validation column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationTable {
    name: String,
    rows: Vec<ValidationRow>,
}

impl ValidationTable {
    /// Creates a table.
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<ValidationRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Builds a table from `(label, path)` pairs.
    pub fn from_pairs<L, P, I>(name: impl Into<String>, pairs: I) -> Self
    where
        L: Into<String>,
        P: Into<String>,
        I: IntoIterator<Item = (L, P)>,
    {
        Self::new(
            name,
            pairs
                .into_iter()
                .map(|(label, path)| ValidationRow::new(label, path))
                .collect(),
        )
    }

    /// Returns the column name this table was selected by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rows in table order.
    #[must_use]
    pub fn rows(&self) -> &[ValidationRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Whether validation stops at the first failing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Abort at the first failing row.
    #[default]
    FailFast,
    /// Evaluate every row and report all failures.
    CollectAll,
}

impl std::str::FromStr for ValidationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_fast" => Ok(Self::FailFast),
            "collect_all" => Ok(Self::CollectAll),
            other => Err(DomainError::UnknownValidationMode(other.to_string())),
        }
    }
}

/// Outcome of a single validation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowVerdict {
    /// The assertion held.
    Passed,
    /// No expected value for this row.
    Skipped,
    /// The assertion failed.
    Failed(AssertionError),
}

/// Per-row result of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    /// Row label.
    pub label: String,
    /// Strategy applied.
    pub rule: MatchRule,
    /// What happened.
    pub verdict: RowVerdict,
}

/// Results of validating one response against one table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Outcomes in table order. In fail-fast mode the list ends at the
    /// first failure.
    pub outcomes: Vec<RowOutcome>,
}

impl ValidationReport {
    /// Number of rows that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|v| matches!(v, RowVerdict::Passed))
    }

    /// Number of rows without an expected value.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|v| matches!(v, RowVerdict::Skipped))
    }

    /// Number of failed rows.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|v| matches!(v, RowVerdict::Failed(_)))
    }

    /// Returns true if no row failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Iterates the failures in table order.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionError> {
        self.outcomes.iter().filter_map(|o| match &o.verdict {
            RowVerdict::Failed(err) => Some(err),
            _ => None,
        })
    }

    /// Converts the report into the first failure, if any.
    ///
    /// # Errors
    ///
    /// Returns the first failing row's assertion error.
    pub fn into_result(self) -> Result<Self, AssertionError> {
        let first = self.failures().next().cloned();
        match first {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    fn count(&self, pred: impl Fn(&RowVerdict) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.verdict)).count()
    }
}
