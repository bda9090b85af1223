//! Path expression parser.
//!
//! Supports dot/bracket notation:
//! - `$`, `$.user.id`, `user.id` (the `$` root is optional)
//! - `items[0]`, `items[-1]`, `[0].id`
//! - `items[*].id`, `user.*`
//! - `['first name']`, `["first.name"]`

use std::fmt;

use caliper_domain::PathError;

/// One navigation step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member access.
    Key(String),
    /// Array element access; negative values count from the end.
    Index(i64),
    /// Every object value or array element.
    Wildcard,
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    source: String,
    segments: Vec<Segment>,
}

impl PathExpr {
    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns `PathError::Syntax` for empty keys, unterminated brackets,
    /// unsupported bracket contents and recursive descent (`..`).
    pub fn parse(expression: &str) -> Result<Self, PathError> {
        let source = expression.trim().to_string();
        let segments = Parser::new(&source).parse()?;
        Ok(Self { source, segments })
    }

    /// Returns the expression as written (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the expression can yield several matches.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    segments: Vec<Segment>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            segments: Vec::new(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> PathError {
        PathError::Syntax {
            expression: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Vec<Segment>, PathError> {
        if self.source.is_empty() {
            return Err(self.error("empty expression"));
        }
        // '$' is the root only when a separator or the end follows it;
        // otherwise it starts a key such as `$id`.
        let mut lookahead = self.source.chars();
        if lookahead.next() == Some('$') && matches!(lookahead.next(), None | Some('.' | '[')) {
            self.chars.next();
        }
        // A key may follow directly at the start or after a '.'.
        let mut expect_key = true;

        while let Some(&ch) = self.chars.peek() {
            match ch {
                '.' => {
                    self.chars.next();
                    if self.chars.peek() == Some(&'.') {
                        return Err(self.error("recursive descent '..' is not supported"));
                    }
                    if self.chars.peek().is_none() {
                        return Err(self.error("trailing '.'"));
                    }
                    expect_key = true;
                }
                '[' => {
                    self.chars.next();
                    let segment = self.bracket()?;
                    self.segments.push(segment);
                    expect_key = false;
                }
                _ if expect_key => {
                    let segment = self.key()?;
                    self.segments.push(segment);
                    expect_key = false;
                }
                other => {
                    return Err(self.error(format!("unexpected character '{other}'")));
                }
            }
        }

        Ok(self.segments)
    }

    fn key(&mut self) -> Result<Segment, PathError> {
        let mut name = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch == '.' || ch == '[' {
                break;
            }
            name.push(ch);
            self.chars.next();
        }
        let name = name.trim();
        match name {
            "" => Err(self.error("empty key")),
            "*" => Ok(Segment::Wildcard),
            _ => Ok(Segment::Key(name.to_string())),
        }
    }

    fn bracket(&mut self) -> Result<Segment, PathError> {
        let quote = match self.chars.peek() {
            Some(&q @ ('\'' | '"')) => {
                self.chars.next();
                Some(q)
            }
            _ => None,
        };

        let mut inner = String::new();
        let mut closed_quote = quote.is_none();
        loop {
            match self.chars.next() {
                None => return Err(self.error("unterminated '['")),
                Some(ch) if Some(ch) == quote && !closed_quote => closed_quote = true,
                Some(']') if closed_quote => break,
                Some(ch) if closed_quote && quote.is_some() => {
                    return Err(self.error(format!("unexpected character '{ch}' after quoted key")));
                }
                Some(ch) => inner.push(ch),
            }
        }

        if quote.is_some() {
            return Ok(Segment::Key(inner));
        }

        let inner = inner.trim();
        if inner == "*" {
            return Ok(Segment::Wildcard);
        }
        inner
            .parse::<i64>()
            .map(Segment::Index)
            .map_err(|_| self.error(format!("invalid index '{inner}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segments(expr: &str) -> Vec<Segment> {
        PathExpr::parse(expr).unwrap().segments().to_vec()
    }

    fn key(name: &str) -> Segment {
        Segment::Key(name.to_string())
    }

    #[test]
    fn test_dotted_keys() {
        assert_eq!(segments("user.id"), vec![key("user"), key("id")]);
        assert_eq!(segments("$.user.id"), vec![key("user"), key("id")]);
        assert_eq!(segments("$"), Vec::<Segment>::new());
        assert_eq!(segments("$[0]"), vec![Segment::Index(0)]);
    }

    #[test]
    fn test_dollar_prefixed_keys() {
        assert_eq!(segments("$id"), vec![key("$id")]);
        assert_eq!(segments("$.$ref"), vec![key("$ref")]);
        assert_eq!(segments("definitions.$schema"), vec![key("definitions"), key("$schema")]);
    }

    #[test]
    fn test_indexes_and_wildcards() {
        assert_eq!(
            segments("items[0].tags[-1]"),
            vec![key("items"), Segment::Index(0), key("tags"), Segment::Index(-1)]
        );
        assert_eq!(
            segments("items[*].id"),
            vec![key("items"), Segment::Wildcard, key("id")]
        );
        assert_eq!(segments("user.*"), vec![key("user"), Segment::Wildcard]);
        assert_eq!(segments("[0]"), vec![Segment::Index(0)]);
        assert!(PathExpr::parse("items[*]").unwrap().has_wildcard());
        assert!(!PathExpr::parse("items[1]").unwrap().has_wildcard());
    }

    #[test]
    fn test_quoted_keys() {
        assert_eq!(
            segments("data['first name']"),
            vec![key("data"), key("first name")]
        );
        assert_eq!(segments(r#"["a.b"].c"#), vec![key("a.b"), key("c")]);
    }

    #[test]
    fn test_syntax_errors() {
        for bad in ["", "a..b", "a.", "items[", "items[x]", "a['b'c]", "a[0]b"] {
            let err = PathExpr::parse(bad).unwrap_err();
            assert!(
                matches!(err, PathError::Syntax { .. }),
                "expected syntax error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_display_keeps_source() {
        let expr = PathExpr::parse("  user.id ").unwrap();
        assert_eq!(expr.to_string(), "user.id");
    }
}
