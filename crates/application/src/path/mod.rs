//! Path resolution into JSON response trees.
//!
//! # Usage
//!
//! ```
//! use caliper_application::path::resolve;
//! use serde_json::json;
//!
//! let body = json!({"items": [{"id": 1}, {"id": 2}]});
//! let ids = resolve(&body, "items[*].id").unwrap().into_value();
//! assert_eq!(ids, json!([1, 2]));
//! ```

pub mod parser;
pub mod resolver;

pub use parser::{PathExpr, Segment};
pub use resolver::{PathMatch, resolve, resolve_expr};
