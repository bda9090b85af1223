//! Concrete HTTP requests built from an API schema and a dataset row.

mod method;

pub use method::HttpMethod;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Username/password pair for HTTP basic authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// How the request payload is encoded on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// JSON-encoded body.
    Json(Value),
    /// `application/x-www-form-urlencoded` body.
    Form(Value),
}

/// A fully resolved request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL without query string.
    pub url: String,
    /// Resolved query parameters.
    pub query: Option<Value>,
    /// Header name/value pairs in schema order.
    pub headers: IndexMap<String, String>,
    /// Basic authentication credentials.
    pub basic_auth: Option<BasicAuth>,
    /// Request payload.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Creates a request without query, headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets a header, replacing an existing one with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let existing = self
            .headers
            .keys()
            .find(|k| k.eq_ignore_ascii_case(&name))
            .cloned();
        if let Some(existing) = existing {
            self.headers.shift_remove(&existing);
        }
        self.headers.insert(name, value.into());
    }

    /// Returns a header value, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Renders the query parameters as `k=v&k2=v2` without encoding.
    ///
    /// Returns `None` when there are no object-shaped query parameters.
    #[must_use]
    pub fn raw_query_string(&self) -> Option<String> {
        let Some(Value::Object(params)) = &self.query else {
            return None;
        };
        Some(
            params
                .iter()
                .map(|(k, v)| format!("{k}={}", crate::value::stringify(v)))
                .collect::<Vec<_>>()
                .join("&"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut request = ApiRequest::new(HttpMethod::Get, "https://api.test/users");
        request.set_header("authorization", "Basic abc");
        request.set_header("Authorization", "Bearer xyz");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer xyz"));
    }

    #[test]
    fn test_raw_query_string() {
        let mut request = ApiRequest::new(HttpMethod::Get, "https://api.test/users");
        assert_eq!(request.raw_query_string(), None);
        request.query = Some(json!({"from": "2024-01-01T10:00:00", "limit": 10}));
        assert_eq!(
            request.raw_query_string().as_deref(),
            Some("from=2024-01-01T10:00:00&limit=10")
        );
    }
}
