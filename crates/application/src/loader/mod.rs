//! Dataset Loader.
//!
//! Turns structured sources into the rows consumed by the template and
//! validation engines. Sources are parsed fully in memory; file access is
//! left to the [`ProjectSource`](crate::ports::ProjectSource) port.

pub mod dataset;
pub mod project;
pub mod source;
pub mod validation;

pub use dataset::{load_dataset, load_expected_table};
pub use project::{load_environment, load_scenario, load_schema};
pub use source::{SourceDocument, SourceError, SourceFormat};
pub use validation::{ValidationMapping, load_validation_table};
