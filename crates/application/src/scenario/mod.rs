//! Scenario execution.

pub mod context;
pub mod runner;

pub use context::ScenarioContext;
pub use runner::ScenarioRunner;
