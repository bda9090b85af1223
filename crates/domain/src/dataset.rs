//! Dataset rows and expected-value rows.
//!
//! A test-data source maps dataset names (`TC01`, `TC02`, ...) to flat
//! parameter mappings. One dataset is selected per scenario and never
//! changes afterwards.

use indexmap::IndexMap;
use serde_json::Value;

/// A flat parameter mapping selected from a test-data source by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataRow {
    name: String,
    values: IndexMap<String, Value>,
}

impl DataRow {
    /// Creates a row with the given dataset name and values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: IndexMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Builds a row from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(name: impl Into<String>, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(
            name,
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the dataset name this row was selected by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns true if the parameter exists, even when its value is null.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates parameters in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Expected values for a validation pass, keyed by validation-row label.
///
/// Null entries are dropped on construction: a row without an expected
/// value carries no assertion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpectedValues {
    values: IndexMap<String, Value>,
}

impl ExpectedValues {
    /// Creates an expected-value row, dropping null entries.
    #[must_use]
    pub fn new(values: IndexMap<String, Value>) -> Self {
        Self {
            values: values.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        }
    }

    /// Builds expected values from `(label, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the expected value for a label, `None` meaning "no assertion".
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.values.get(label)
    }

    /// Returns the number of labels with an expected value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there is nothing to assert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&DataRow> for ExpectedValues {
    fn from(row: &DataRow) -> Self {
        Self::new(row.values.clone())
    }
}
