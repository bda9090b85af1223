//! Validation mapping (`validation_mapping.yml`).
//!
//! The document maps a column name to `{row label -> path expression}`.
//! A scenario selects one column per validation step.

use caliper_domain::value::stringify;
use caliper_domain::{ValidationRow, ValidationTable};
use indexmap::IndexMap;
use serde_json::Value;

use super::source::{SourceDocument, SourceError};

/// Every column of a validation source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationMapping {
    origin: String,
    columns: IndexMap<String, Vec<ValidationRow>>,
}

impl ValidationMapping {
    /// Selects one column as a validation table.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::ValidationColumnNotFound` for unknown columns.
    pub fn table(&self, column: &str) -> Result<ValidationTable, SourceError> {
        self.columns
            .get(column)
            .map(|rows| ValidationTable::new(column, rows.clone()))
            .ok_or_else(|| SourceError::ValidationColumnNotFound {
                column: column.to_string(),
                origin: self.origin.clone(),
            })
    }
}

/// Loads every column of a validation source.
///
/// Rows with a null path are dropped. Each row's match rule is decided here,
/// from its label, and never re-evaluated.
///
/// # Errors
///
/// Returns `SourceError::InvalidShape` if the source or a column is not a
/// mapping.
pub fn load_validation_table(source: &SourceDocument) -> Result<ValidationMapping, SourceError> {
    let mut columns = IndexMap::new();

    for (column, rows) in source.mapping()? {
        let rows = match rows {
            Value::Object(rows) => rows
                .iter()
                .filter(|(_, path)| !path.is_null())
                .map(|(label, path)| ValidationRow::new(label.clone(), stringify(path)))
                .collect(),
            Value::Null => Vec::new(),
            _ => {
                return Err(source.invalid(format!(
                    "validation column '{column}' must map labels to paths"
                )));
            }
        };
        columns.insert(column.clone(), rows);
    }

    Ok(ValidationMapping {
        origin: source.origin().to_string(),
        columns,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::loader::source::SourceFormat;
    use caliper_domain::MatchRule;
    use pretty_assertions::assert_eq;

    const MAPPING: &str = r"
TC01:
  Exact_id: id
  Regex_status: status
  Contains_tags: user.tags
  Exact_unused:
TC02:
  Exact_id: data.id
";

    fn mapping() -> ValidationMapping {
        let doc = SourceDocument::parse("validation_mapping.yml", MAPPING, SourceFormat::Yaml)
            .unwrap();
        load_validation_table(&doc).unwrap()
    }

    #[test]
    fn test_table_rows_and_rules() {
        let table = mapping().table("TC01").unwrap();
        let rows: Vec<_> = table
            .rows()
            .iter()
            .map(|r| (r.label.as_str(), r.path.as_str(), r.rule))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Exact_id", "id", MatchRule::Exact),
                ("Regex_status", "status", MatchRule::Regex),
                ("Contains_tags", "user.tags", MatchRule::Contains),
            ]
        );
    }

    #[test]
    fn test_unknown_column() {
        let err = mapping().table("TC03").unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation column 'TC03' not found in validation_mapping.yml"
        );
    }

    #[test]
    fn test_column_shape_checked() {
        let doc = SourceDocument::from_value("v.yml", serde_json::json!({"TC01": ["id"]}));
        assert!(matches!(
            load_validation_table(&doc).unwrap_err(),
            SourceError::InvalidShape { .. }
        ));
    }
}
