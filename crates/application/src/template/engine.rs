//! Template substitution engine.
//!
//! Turns a parameterized schema plus a dataset row into a concrete payload.
//! Branches that end up empty are pruned, and placeholders whose key is not
//! in the row are dropped and reported in [`Resolution::unresolved`].

use std::fmt;

use caliper_domain::{DataRow, LiteralPolicy, PlaceholderPolicy};
use serde_json::{Map, Value};
use thiserror::Error;

use super::placeholder::as_placeholder;

/// A placeholder that had no value in the dataset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlaceholder {
    /// Location in the schema, in path-expression notation (`$.user.id`).
    pub location: String,
    /// Parameter name inside the markers.
    pub name: String,
}

impl fmt::Display for UnresolvedPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) at {}", self.name, self.location)
    }
}

/// Raised in strict mode when placeholders stay unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unresolved placeholders in dataset '{dataset}': {}", list(.missing))]
pub struct TemplateError {
    /// Dataset the schema was resolved against.
    pub dataset: String,
    /// Every unresolved placeholder.
    pub missing: Vec<UnresolvedPlaceholder>,
}

fn list(missing: &[UnresolvedPlaceholder]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of resolving a schema against a dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The resolved payload; `None` means "omit this section".
    pub payload: Option<Value>,
    /// Placeholders that had no value, in document order.
    pub unresolved: Vec<UnresolvedPlaceholder>,
    dataset: String,
}

impl Resolution {
    /// Returns true if every placeholder was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Applies a placeholder policy.
    ///
    /// # Errors
    ///
    /// In strict mode, returns `TemplateError` listing every unresolved
    /// placeholder.
    pub fn with_policy(self, policy: PlaceholderPolicy) -> Result<Option<Value>, TemplateError> {
        match policy {
            PlaceholderPolicy::Lenient => {
                for missing in &self.unresolved {
                    tracing::warn!(dataset = %self.dataset, "dropping unresolved placeholder {missing}");
                }
                Ok(self.payload)
            }
            PlaceholderPolicy::Strict if self.is_complete() => Ok(self.payload),
            PlaceholderPolicy::Strict => Err(TemplateError {
                dataset: self.dataset,
                missing: self.unresolved,
            }),
        }
    }
}

/// The substitution engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine {
    literals: LiteralPolicy,
}

impl TemplateEngine {
    /// Creates an engine that drops literal scalars.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            literals: LiteralPolicy::Drop,
        }
    }

    /// Sets the literal-scalar policy (builder pattern).
    #[must_use]
    pub const fn with_literal_policy(mut self, policy: LiteralPolicy) -> Self {
        self.literals = policy;
        self
    }

    /// Resolves `schema` against `row`.
    ///
    /// Neither input is modified; every call builds a new payload.
    #[must_use]
    pub fn substitute(&self, schema: &Value, row: &DataRow) -> Resolution {
        let mut walk = Walk {
            row,
            literals: self.literals,
            unresolved: Vec::new(),
        };
        let payload = walk.node(schema, &mut String::from("$"));
        Resolution {
            payload,
            unresolved: walk.unresolved,
            dataset: row.name().to_string(),
        }
    }
}

/// Resolves `schema` against `row` with the default engine.
#[must_use]
pub fn substitute(schema: &Value, row: &DataRow) -> Resolution {
    TemplateEngine::new().substitute(schema, row)
}

struct Walk<'r> {
    row: &'r DataRow,
    literals: LiteralPolicy,
    unresolved: Vec<UnresolvedPlaceholder>,
}

impl Walk<'_> {
    fn node(&mut self, node: &Value, location: &mut String) -> Option<Value> {
        match node {
            Value::Array(items) => self.sequence(items, location),
            Value::Object(map) => self.mapping(map, location),
            scalar => self.scalar(scalar, location),
        }
    }

    fn sequence(&mut self, items: &[Value], location: &mut String) -> Option<Value> {
        let mut resolved = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let mark = location.len();
            location.push_str(&format!("[{index}]"));
            if let Some(value) = self.node(item, location) {
                resolved.push(value);
            }
            location.truncate(mark);
        }
        (!resolved.is_empty()).then_some(Value::Array(resolved))
    }

    fn mapping(&mut self, map: &Map<String, Value>, location: &mut String) -> Option<Value> {
        let mut resolved = Map::new();
        for (key, value) in map {
            let mark = location.len();
            location.push('.');
            location.push_str(key);
            if let Some(value) = self.node(value, location) {
                resolved.insert(key.clone(), value);
            }
            location.truncate(mark);
        }
        (!resolved.is_empty()).then_some(Value::Object(resolved))
    }

    fn scalar(&mut self, scalar: &Value, location: &str) -> Option<Value> {
        let Some(name) = as_placeholder(scalar) else {
            return match self.literals {
                LiteralPolicy::Drop => None,
                LiteralPolicy::Keep => Some(scalar.clone()),
            };
        };

        if let Some(value) = self.row.get(name) {
            return Some(value.clone());
        }
        self.unresolved.push(UnresolvedPlaceholder {
            location: location.to_string(),
            name: name.to_string(),
        });
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row() -> DataRow {
        DataRow::from_pairs(
            "TC01",
            [
                ("user_id", json!("42")),
                ("age", json!(30)),
                ("tag", json!("vip")),
                ("nickname", Value::Null),
            ],
        )
    }

    #[test]
    fn test_flat_mapping() {
        let resolution = substitute(&json!({"id": "(user_id)"}), &row());
        assert_eq!(resolution.payload, Some(json!({"id": "42"})));
        assert!(resolution.is_complete());
    }

    #[test]
    fn test_nested_structures() {
        let schema = json!({
            "user": {"id": "(user_id)", "age": "(age)"},
            "tags": ["(tag)", "(missing_tag)"],
            "groups": [{"name": "(tag)"}, {"name": "(nope)"}]
        });
        let resolution = substitute(&schema, &row());
        assert_eq!(
            resolution.payload,
            Some(json!({
                "user": {"id": "42", "age": 30},
                "tags": ["vip"],
                "groups": [{"name": "vip"}]
            }))
        );
        assert_eq!(resolution.unresolved.len(), 2);
    }

    #[test]
    fn test_unresolved_are_dropped_and_reported() {
        let schema = json!({"id": "(user_id)", "email": "(email)", "tags": ["(x)"]});
        let resolution = substitute(&schema, &row());
        assert_eq!(resolution.payload, Some(json!({"id": "42"})));
        assert_eq!(
            resolution.unresolved,
            vec![
                UnresolvedPlaceholder {
                    location: "$.email".to_string(),
                    name: "email".to_string()
                },
                UnresolvedPlaceholder {
                    location: "$.tags[0]".to_string(),
                    name: "x".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_empty_and_unresolvable_schemas_yield_none() {
        assert_eq!(substitute(&json!({}), &row()).payload, None);
        assert_eq!(substitute(&json!([]), &row()).payload, None);
        assert_eq!(substitute(&json!({"a": "(nope)"}), &row()).payload, None);
        assert_eq!(
            substitute(&json!({"a": {"b": ["(nope)"]}}), &row()).payload,
            None
        );
    }

    #[test]
    fn test_literals_dropped_by_default() {
        let schema = json!({"id": "(user_id)", "type": "user", "count": 3});
        assert_eq!(substitute(&schema, &row()).payload, Some(json!({"id": "42"})));
        assert_eq!(substitute(&json!({"type": "user"}), &row()).payload, None);
    }

    #[test]
    fn test_literals_kept_on_request() {
        let engine = TemplateEngine::new().with_literal_policy(LiteralPolicy::Keep);
        let schema = json!({"id": "(user_id)", "type": "user", "list": [1, "(tag)"]});
        assert_eq!(
            engine.substitute(&schema, &row()).payload,
            Some(json!({"id": "42", "type": "user", "list": [1, "vip"]}))
        );
    }

    #[test]
    fn test_null_dataset_value_is_present() {
        let resolution = substitute(&json!({"nick": "(nickname)"}), &row());
        assert_eq!(resolution.payload, Some(json!({"nick": null})));
        assert!(resolution.is_complete());
    }

    #[test]
    fn test_inputs_untouched_and_idempotent() {
        let schema = json!({"id": "(user_id)", "tags": ["(tag)"]});
        let data = row();
        let schema_before = schema.clone();
        let data_before = data.clone();

        let first = substitute(&schema, &data);
        let second = substitute(&schema, &data);

        assert_eq!(first, second);
        assert_eq!(schema, schema_before);
        assert_eq!(data, data_before);
    }

    #[test]
    fn test_key_order_follows_schema() {
        let schema = json!({"z": "(tag)", "a": "(user_id)"});
        let payload = substitute(&schema, &row()).payload.unwrap();
        let keys: Vec<_> = payload.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_strict_policy() {
        let resolution = substitute(&json!({"id": "(user_id)", "e": "(email)"}), &row());
        let err = resolution.with_policy(PlaceholderPolicy::Strict).unwrap_err();
        assert_eq!(err.dataset, "TC01");
        assert_eq!(
            err.to_string(),
            "unresolved placeholders in dataset 'TC01': (email) at $.e"
        );

        let lenient = substitute(&json!({"id": "(user_id)", "e": "(email)"}), &row())
            .with_policy(PlaceholderPolicy::Lenient)
            .unwrap();
        assert_eq!(lenient, Some(json!({"id": "42"})));
    }
}
