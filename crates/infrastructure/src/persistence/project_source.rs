//! File system project source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use caliper_application::loader::{SourceDocument, SourceError, SourceFormat};
use caliper_application::ports::ProjectSource;
use tokio::fs;
use tracing::debug;

/// Reads project documents from disk using `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct FileSystemProject;

impl FileSystemProject {
    /// Creates a new `FileSystemProject`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SourceError + '_ {
    move |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn is_scenario_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "yml" | "yaml"))
}

#[async_trait]
impl ProjectSource for FileSystemProject {
    async fn read_document(&self, path: &Path) -> Result<SourceDocument, SourceError> {
        let content = fs::read_to_string(path).await.map_err(io_error(path))?;
        debug!(path = %path.display(), bytes = content.len(), "Document read");
        SourceDocument::parse(
            path.display().to_string(),
            &content,
            SourceFormat::from_path(path),
        )
    }

    async fn list_scenarios(&self, dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let mut entries = Vec::new();
        let mut reader = fs::read_dir(dir).await.map_err(io_error(dir))?;

        while let Some(entry) = reader.next_entry().await.map_err(io_error(dir))? {
            let path = entry.path();
            if is_scenario_file(&path) {
                entries.push(path);
            }
        }

        entries.sort(); // Deterministic ordering
        Ok(entries)
    }
}
