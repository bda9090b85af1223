//! Caliper Domain - Core types
//!
//! This crate defines the domain model for the Caliper API test harness:
//! datasets, request schemas, validation tables, scenarios and the
//! assertion taxonomy. All types here are pure Rust with no I/O.

pub mod dataset;
pub mod error;
pub mod request;
pub mod response;
pub mod scenario;
pub mod schema;
pub mod settings;
pub mod validation;
pub mod value;

pub use dataset::{DataRow, ExpectedValues};
pub use error::{AssertionError, AssertionResult, DomainError, DomainResult, PathError};
pub use request::{ApiRequest, BasicAuth, HttpMethod, RequestBody};
pub use response::{ApiResponse, StatusCode};
pub use scenario::{RunSummary, Scenario, ScenarioOutcome, Step};
pub use schema::{ApiSchema, TOKEN_API};
pub use settings::{ApiFiles, EnvironmentConfig, LiteralPolicy, PlaceholderPolicy, RunConfig};
pub use validation::{
    MatchRule, RowOutcome, RowVerdict, ValidationMode, ValidationReport, ValidationRow,
    ValidationTable,
};
