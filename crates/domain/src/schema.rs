//! API request schema (`request.json`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::BasicAuth;

/// Name of the API whose calls obtain an OAuth2 access token.
///
/// It is addressed through `token_uri`, authenticates with the client
/// credentials and sends its body form-encoded.
pub const TOKEN_API: &str = "oauth2_token";

/// The parameterized description of one API endpoint.
///
/// `query_params` and `request` are templates handed to the substitution
/// engine once a dataset is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSchema {
    /// Path appended to the environment's base URI.
    pub base_path: String,
    /// Parameterized query parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<Value>,
    /// Basic authentication credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_params: Option<BasicAuth>,
    /// Static request headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<IndexMap<String, Value>>,
    /// Parameterized request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
}

impl ApiSchema {
    /// Returns the headers with values cast to strings.
    #[must_use]
    pub fn headers(&self) -> IndexMap<String, String> {
        self.header
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), crate::value::stringify(v)))
            .collect()
    }
}
