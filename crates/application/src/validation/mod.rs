//! Response validation.
//!
//! Each validation row names a path into the response and carries a
//! [`MatchRule`](caliper_domain::MatchRule). The expected value for the row
//! comes from the test-data column selected by the scenario.

pub mod engine;
mod strategy;

pub use engine::{ResponseValidator, assert_status, check_row, validate};
