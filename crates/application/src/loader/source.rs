//! Structured source documents (YAML or JSON).

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading or interpreting a source document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML/JSON.
    #[error("failed to parse {origin}: {reason}")]
    Parse {
        /// Where the document came from.
        origin: String,
        /// Parser message.
        reason: String,
    },

    /// The document parsed but does not have the expected structure.
    #[error("unexpected structure in {origin}: {reason}")]
    InvalidShape {
        /// Where the document came from.
        origin: String,
        /// What was expected.
        reason: String,
    },

    /// The requested dataset is not in the test-data source.
    #[error("dataset '{dataset}' not found in {origin}")]
    DatasetNotFound {
        /// Requested dataset name.
        dataset: String,
        /// Where the document came from.
        origin: String,
    },

    /// The requested validation column is not in the validation source.
    #[error("validation column '{column}' not found in {origin}")]
    ValidationColumnNotFound {
        /// Requested column name.
        column: String,
        /// Where the document came from.
        origin: String,
    },

    /// The requested environment is not in the environment config.
    #[error("environment '{environment}' not found in {origin}")]
    EnvironmentNotFound {
        /// Requested environment.
        environment: String,
        /// Where the document came from.
        origin: String,
    },
}

/// Format of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl SourceFormat {
    /// Picks the format from a file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// A fully loaded, parsed source document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    origin: String,
    root: Value,
}

impl SourceDocument {
    /// Parses document text.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Parse` if the text is not valid in `format`.
    pub fn parse(
        origin: impl Into<String>,
        content: &str,
        format: SourceFormat,
    ) -> Result<Self, SourceError> {
        let origin = origin.into();
        let parsed = match format {
            SourceFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        let root = parsed.map_err(|reason| SourceError::Parse {
            origin: origin.clone(),
            reason,
        })?;
        Ok(Self { origin, root })
    }

    /// Wraps an already decoded value.
    #[must_use]
    pub fn from_value(origin: impl Into<String>, root: Value) -> Self {
        Self {
            origin: origin.into(),
            root,
        }
    }

    /// Returns where the document came from (usually a file path).
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the document root.
    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Returns the root as a mapping.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidShape` if the root is not a mapping.
    pub fn mapping(&self) -> Result<&serde_json::Map<String, Value>, SourceError> {
        self.root
            .as_object()
            .ok_or_else(|| self.invalid("expected a mapping at the top level"))
    }

    /// Deserializes the whole document into `T`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidShape` if the document does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, SourceError> {
        T::deserialize(&self.root).map_err(|e| self.invalid(e.to_string()))
    }

    pub(crate) fn invalid(&self, reason: impl Into<String>) -> SourceError {
        SourceError::InvalidShape {
            origin: self.origin.clone(),
            reason: reason.into(),
        }
    }
}
