//! Project source port

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::loader::{SourceDocument, SourceError};

/// Read access to a project's configuration, schemas and scenarios.
///
/// Implementations read each document fully into memory and hand it back
/// parsed. Any read failure is reported as `SourceError::Io`.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Reads and parses the document at `path`.
    ///
    /// The format follows the file extension (`.json` or YAML).
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Io` if the file cannot be read and
    /// `SourceError::Parse` if it is not valid YAML/JSON.
    async fn read_document(&self, path: &Path) -> Result<SourceDocument, SourceError>;

    /// Lists the scenario files in `dir`, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Io` if the directory cannot be read.
    async fn list_scenarios(&self, dir: &Path) -> Result<Vec<PathBuf>, SourceError>;
}
