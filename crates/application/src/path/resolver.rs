//! Path evaluation against a JSON tree.

use caliper_domain::PathError;
use serde_json::Value;

use super::parser::{PathExpr, Segment};

/// Nodes matched by a path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PathMatch<'a> {
    /// A single node matched by an expression without wildcards.
    One(&'a Value),
    /// All nodes matched by a wildcard expression, in document order.
    Many(Vec<&'a Value>),
}

impl PathMatch<'_> {
    /// Converts the match into an owned value; multiple matches become an array.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::One(value) => value.clone(),
            Self::Many(values) => Value::Array(values.into_iter().cloned().collect()),
        }
    }

    /// Returns the number of matched nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    /// Always false: an empty match is reported as `PathError::NotFound`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses `expression` and evaluates it against `tree`.
///
/// # Errors
///
/// Returns `PathError::Syntax` for malformed expressions and
/// `PathError::NotFound` when nothing matches.
pub fn resolve<'a>(tree: &'a Value, expression: &str) -> Result<PathMatch<'a>, PathError> {
    let expr = PathExpr::parse(expression)?;
    resolve_expr(tree, &expr)
}

/// Evaluates an already parsed expression against `tree`.
///
/// # Errors
///
/// Returns `PathError::NotFound` when nothing matches.
pub fn resolve_expr<'a>(tree: &'a Value, expr: &PathExpr) -> Result<PathMatch<'a>, PathError> {
    let mut current = vec![tree];

    for segment in expr.segments() {
        current = current
            .into_iter()
            .flat_map(|node| step(node, segment))
            .collect();
        if current.is_empty() {
            break;
        }
    }

    let not_found = || PathError::NotFound {
        expression: expr.as_str().to_string(),
    };

    if expr.has_wildcard() {
        if current.is_empty() {
            return Err(not_found());
        }
        return Ok(PathMatch::Many(current));
    }

    current.into_iter().next().map(PathMatch::One).ok_or_else(not_found)
}

fn step<'a>(node: &'a Value, segment: &Segment) -> Vec<&'a Value> {
    match (segment, node) {
        (Segment::Key(key), Value::Object(map)) => map.get(key).into_iter().collect(),
        (Segment::Index(index), Value::Array(items)) => {
            element(items, *index).into_iter().collect()
        }
        (Segment::Wildcard, Value::Object(map)) => map.values().collect(),
        (Segment::Wildcard, Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    }
}

fn element(items: &[Value], index: i64) -> Option<&Value> {
    let len = i64::try_from(items.len()).ok()?;
    let position = if index < 0 { len + index } else { index };
    usize::try_from(position).ok().and_then(|i| items.get(i))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree() -> Value {
        json!({
            "id": 42,
            "status": "OK",
            "user": {"name": "Ada", "roles": ["admin", "dev"]},
            "items": [
                {"id": 1, "price": 9.5},
                {"id": 2, "price": 12.0},
                {"id": 3}
            ],
            "matrix": [["a", 1], ["b", 2]],
            "empty": []
        })
    }

    #[test]
    fn test_single_values() {
        let tree = tree();
        assert_eq!(resolve(&tree, "id").unwrap(), PathMatch::One(&json!(42)));
        assert_eq!(
            resolve(&tree, "$.user.name").unwrap(),
            PathMatch::One(&json!("Ada"))
        );
        assert_eq!(
            resolve(&tree, "items[1].id").unwrap().into_value(),
            json!(2)
        );
        assert_eq!(
            resolve(&tree, "user.roles[-1]").unwrap().into_value(),
            json!("dev")
        );
        assert_eq!(resolve(&tree, "$").unwrap().into_value(), tree);
    }

    #[test]
    fn test_wildcards_collect_matches() {
        let tree = tree();
        let ids = resolve(&tree, "items[*].id").unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.into_value(), json!([1, 2, 3]));

        // Missing members are skipped, not errors.
        assert_eq!(
            resolve(&tree, "items[*].price").unwrap().into_value(),
            json!([9.5, 12.0])
        );
        assert_eq!(
            resolve(&tree, "user.*").unwrap().into_value(),
            json!(["Ada", ["admin", "dev"]])
        );
    }

    #[test]
    fn test_wildcard_with_single_match_stays_a_list() {
        let tree = json!({"items": [{"id": 7}]});
        assert_eq!(
            resolve(&tree, "items[*].id").unwrap(),
            PathMatch::Many(vec![&json!(7)])
        );
    }

    #[test]
    fn test_not_found() {
        let tree = tree();
        for expr in ["missing", "user.age", "items[9]", "id.nested", "empty[*]", "items[-4]"] {
            assert_eq!(
                resolve(&tree, expr).unwrap_err(),
                PathError::NotFound {
                    expression: expr.to_string()
                },
                "{expr}"
            );
        }
    }

    #[test]
    fn test_dollar_key_is_not_the_root() {
        let tree = json!({"$id": "schema-1", "id": 42});
        assert_eq!(resolve(&tree, "$id").unwrap().into_value(), json!("schema-1"));
        assert_eq!(
            resolve(&json!({"id": 42}), "$ref").unwrap_err(),
            PathError::NotFound {
                expression: "$ref".to_string()
            }
        );
    }

    #[test]
    fn test_syntax_error_propagates() {
        let tree = tree();
        assert!(matches!(
            resolve(&tree, "items[").unwrap_err(),
            PathError::Syntax { .. }
        ));
    }

    #[test]
    fn test_tree_not_mutated() {
        let tree = tree();
        let before = tree.clone();
        let _ = resolve(&tree, "items[*].id").unwrap().into_value();
        assert_eq!(tree, before);
    }
}
