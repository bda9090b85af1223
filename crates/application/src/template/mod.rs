//! Template substitution of `(placeholder)` schemas.
//!
//! # Usage
//!
//! ```
//! use caliper_application::template::substitute;
//! use caliper_domain::DataRow;
//! use serde_json::json;
//!
//! let row = DataRow::from_pairs("TC01", [("user_id", json!("42"))]);
//! let resolution = substitute(&json!({"id": "(user_id)"}), &row);
//! assert_eq!(resolution.payload, Some(json!({"id": "42"})));
//! ```

pub mod engine;
pub mod placeholder;

pub use engine::{Resolution, TemplateEngine, TemplateError, UnresolvedPlaceholder, substitute};
pub use placeholder::placeholder_name;
