//! Caliper Application - Engines and scenario orchestration
//!
//! This crate holds the pure engines of the harness (path resolution,
//! template substitution, dataset loading and response validation) and the
//! scenario runner that drives them. I/O goes through the ports in
//! [`ports`], implemented by the infrastructure crate.

pub mod error;
pub mod loader;
pub mod path;
pub mod ports;
pub mod scenario;
pub mod template;
pub mod validation;

pub use error::{ScenarioError, ScenarioResult};
pub use loader::{SourceDocument, SourceError, SourceFormat, ValidationMapping};
pub use path::{PathExpr, PathMatch, resolve};
pub use ports::{HttpClient, HttpClientError, ProjectSource, ReportError, ResultsSink};
pub use scenario::{ScenarioContext, ScenarioRunner};
pub use template::{Resolution, TemplateEngine, TemplateError, substitute};
pub use validation::{ResponseValidator, assert_status, validate};
