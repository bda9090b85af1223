//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the scenario runner and the outside
//! world. Adapters live in the infrastructure layer.

mod http_client;
mod project;
mod results;

pub use http_client::{HttpClient, HttpClientError};
pub use project::ProjectSource;
pub use results::{ReportError, ResultsSink};
