//! Dataset and expected-value selection from a test-data source.

use caliper_domain::{DataRow, ExpectedValues};
use indexmap::IndexMap;
use serde_json::Value;

use super::source::{SourceDocument, SourceError};

/// Selects the flat parameter row named `dataset`.
///
/// # Errors
///
/// Returns `SourceError::DatasetNotFound` if the source has no such key and
/// `SourceError::InvalidShape` if the source or the dataset is not a mapping.
pub fn load_dataset(source: &SourceDocument, dataset: &str) -> Result<DataRow, SourceError> {
    Ok(DataRow::new(dataset, select(source, dataset)?))
}

/// Projects the test-data source onto the `dataset` column.
///
/// The result is keyed by validation-row label. Null entries are dropped,
/// so rows without an expected value carry no assertion.
///
/// # Errors
///
/// Same as [`load_dataset`].
pub fn load_expected_table(
    source: &SourceDocument,
    dataset: &str,
) -> Result<ExpectedValues, SourceError> {
    Ok(ExpectedValues::new(select(source, dataset)?))
}

fn select(source: &SourceDocument, dataset: &str) -> Result<IndexMap<String, Value>, SourceError> {
    let root = source.mapping()?;
    let selected = root
        .get(dataset)
        .ok_or_else(|| SourceError::DatasetNotFound {
            dataset: dataset.to_string(),
            origin: source.origin().to_string(),
        })?;

    match selected {
        Value::Object(values) => Ok(values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
        Value::Null => Ok(IndexMap::new()),
        _ => Err(source.invalid(format!("dataset '{dataset}' must be a mapping"))),
    }
}
