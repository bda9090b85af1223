//! Results sink port

use std::path::PathBuf;

use async_trait::async_trait;
use caliper_domain::{ApiRequest, ApiResponse, RunConfig, RunSummary};
use thiserror::Error;

/// Errors raised while writing run results.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A results file or directory could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Cleaning would remove the working directory, a protected directory,
    /// or one of their ancestors.
    #[error("refusing to clean {path}: it contains {protected}")]
    UnsafeClean {
        /// Results directory that was to be removed.
        path: PathBuf,
        /// Directory that would have been removed with it.
        protected: PathBuf,
    },

    /// The run summary could not be serialized.
    #[error("failed to serialize run summary: {0}")]
    Serialization(String),
}

/// Destination for per-call attachments and the end-of-run summary.
#[async_trait]
pub trait ResultsSink: Send + Sync {
    /// Removes results left by a previous run.
    ///
    /// # Errors
    ///
    /// Returns an error if the results directory cannot be reset.
    async fn clean(&self) -> Result<(), ReportError>;

    /// Records one HTTP exchange made by `scenario`.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment cannot be written.
    async fn record_exchange(
        &self,
        scenario: &str,
        request: &ApiRequest,
        response: &ApiResponse,
    ) -> Result<(), ReportError>;

    /// Writes the environment description and the run summary.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    async fn finish(&self, config: &RunConfig, summary: &RunSummary) -> Result<(), ReportError>;
}
