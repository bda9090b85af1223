//! Per-scenario state carried between steps.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use caliper_domain::{
    ApiRequest, ApiResponse, ApiSchema, DataRow, EnvironmentConfig, ExpectedValues, HttpMethod,
    PlaceholderPolicy, RequestBody, TOKEN_API,
};
use serde_json::Value;
use tracing::debug;

use crate::error::{ScenarioError, ScenarioResult};
use crate::template::TemplateEngine;

/// State accumulated by the steps of one scenario.
///
/// A fresh context is created for every scenario, so nothing leaks between
/// scenarios. Selecting another API clears the request parts of the previous
/// one but keeps the last response, the expected values and the access token.
#[derive(Debug, Default)]
pub struct ScenarioContext {
    api: Option<String>,
    schema: Option<ApiSchema>,
    url: Option<String>,
    query: Option<Value>,
    body: Option<Value>,
    expected: Option<ExpectedValues>,
    response: Option<ApiResponse>,
    access_token: Option<String>,
}

impl ScenarioContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the request parts of the current API.
    pub fn clear_api(&mut self) {
        self.api = None;
        self.schema = None;
        self.url = None;
        self.query = None;
        self.body = None;
    }

    /// Makes `api` the current API.
    ///
    /// The URL is the environment's base URI followed by the schema's
    /// `base_path`. The token API is addressed through `token_uri`. Body and
    /// query start out as the raw schema templates.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::MissingEnvironmentSetting` if the token API is
    /// selected and the environment has no `token_uri`.
    pub fn select_api(
        &mut self,
        api: &str,
        schema: ApiSchema,
        env: &EnvironmentConfig,
        environment: &str,
    ) -> ScenarioResult<()> {
        self.clear_api();

        let base = if api == TOKEN_API {
            env.token_uri
                .as_deref()
                .ok_or_else(|| ScenarioError::MissingEnvironmentSetting {
                    environment: environment.to_string(),
                    setting: "token_uri",
                })?
        } else {
            env.host_uri.as_str()
        };

        let url = format!("{base}{}", schema.base_path);
        debug!(api, url = %url, "API selected");
        self.url = Some(url);
        self.query.clone_from(&schema.query_params);
        self.body.clone_from(&schema.request);
        self.api = Some(api.to_string());
        self.schema = Some(schema);
        Ok(())
    }

    /// Resolves the body and query templates of the current API against
    /// `row` and stores the expected values for later validation.
    ///
    /// Templates are always taken from the schema, so applying another
    /// dataset replaces the previous payload.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::NoApiSelected` without a current API and
    /// `ScenarioError::Template` when the strict policy rejects unresolved
    /// placeholders.
    pub fn apply_dataset(
        &mut self,
        row: &DataRow,
        expected: ExpectedValues,
        engine: &TemplateEngine,
        policy: PlaceholderPolicy,
    ) -> ScenarioResult<()> {
        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| ScenarioError::NoApiSelected {
                step: format!("set request body for \"{}\"", row.name()),
            })?;

        let body = match &schema.request {
            Some(template) => engine.substitute(template, row).with_policy(policy)?,
            None => None,
        };
        let query = match &schema.query_params {
            Some(template) => engine.substitute(template, row).with_policy(policy)?,
            None => None,
        };

        debug!(dataset = row.name(), body = ?body, query = ?query, "Dataset applied");
        self.body = body;
        self.query = query;
        self.expected = Some(expected);
        Ok(())
    }

    /// Builds the request for the current API.
    ///
    /// A saved access token is sent as a bearer token. Otherwise the token
    /// API authenticates with the environment's client credentials. The token
    /// API sends its body form-encoded, every other API as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::NoApiSelected` without a current API and
    /// `ScenarioError::MissingEnvironmentSetting` if the token API needs
    /// client credentials the environment does not define.
    pub fn build_request(
        &self,
        method: HttpMethod,
        env: &EnvironmentConfig,
        environment: &str,
    ) -> ScenarioResult<ApiRequest> {
        let (Some(api), Some(schema), Some(url)) = (&self.api, &self.schema, &self.url) else {
            return Err(ScenarioError::NoApiSelected {
                step: format!("call method \"{method}\""),
            });
        };
        let is_token_api = api == TOKEN_API;

        let mut request = ApiRequest::new(method, url.clone());
        request.headers = schema.headers();
        request.basic_auth.clone_from(&schema.auth_params);
        request.query.clone_from(&self.query);

        if let Some(token) = &self.access_token {
            request.set_header("Authorization", format!("Bearer {token}"));
        } else if is_token_api {
            let missing = |setting| ScenarioError::MissingEnvironmentSetting {
                environment: environment.to_string(),
                setting,
            };
            let id = env.client_id.as_deref().ok_or_else(|| missing("clientId"))?;
            let secret = env
                .client_secret
                .as_deref()
                .ok_or_else(|| missing("clientSecret"))?;
            let encoded = STANDARD.encode(format!("{id}:{secret}"));
            request.set_header("Authorization", format!("Basic {encoded}"));
        }

        request.body = match self.body.clone() {
            None => RequestBody::None,
            Some(body) if is_token_api => RequestBody::Form(body),
            Some(body) => RequestBody::Json(body),
        };
        Ok(request)
    }

    /// Returns the current API name.
    #[must_use]
    pub fn api(&self) -> Option<&str> {
        self.api.as_deref()
    }

    /// Returns the current request URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the current body, raw or resolved.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the current query parameters, raw or resolved.
    #[must_use]
    pub const fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    /// Returns the expected values of the last applied dataset.
    #[must_use]
    pub const fn expected(&self) -> Option<&ExpectedValues> {
        self.expected.as_ref()
    }

    /// Stores the response of the last call.
    pub fn set_response(&mut self, response: ApiResponse) {
        self.response = Some(response);
    }

    /// Returns the response of the last call.
    #[must_use]
    pub const fn response(&self) -> Option<&ApiResponse> {
        self.response.as_ref()
    }

    /// Stores `access_token` from the last response.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::NoResponse` before any call and
    /// `ScenarioError::MissingAccessToken` if the body has no string
    /// `access_token`.
    pub fn save_access_token(&mut self) -> ScenarioResult<()> {
        let response = self.response.as_ref().ok_or_else(|| ScenarioError::NoResponse {
            step: "save access token".to_string(),
        })?;
        let token = response
            .body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or(ScenarioError::MissingAccessToken)?;
        self.access_token = Some(token.to_string());
        Ok(())
    }

    /// Returns the saved access token.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn env() -> EnvironmentConfig {
        EnvironmentConfig {
            host_uri: "https://api.test".to_string(),
            token_uri: Some("https://auth.test".to_string()),
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
        }
    }

    fn schema(value: Value) -> ApiSchema {
        serde_json::from_value(value).unwrap()
    }

    fn user_schema() -> ApiSchema {
        schema(json!({
            "base_path": "/users",
            "query_params": {"verbose": "(verbose)"},
            "auth_params": {"username": "u", "password": "p"},
            "header": {"Content-Type": "application/json"},
            "request": {"id": "(user_id)", "name": "(name)"}
        }))
    }

    #[test]
    fn test_select_api_builds_url() {
        let mut ctx = ScenarioContext::new();
        ctx.select_api("create_user", user_schema(), &env(), "dev").unwrap();
        assert_eq!(ctx.url(), Some("https://api.test/users"));
        assert_eq!(ctx.body(), Some(&json!({"id": "(user_id)", "name": "(name)"})));
    }

    #[test]
    fn test_token_api_uses_token_uri() {
        let mut ctx = ScenarioContext::new();
        let token = schema(json!({"base_path": "/oauth/token"}));
        ctx.select_api(TOKEN_API, token.clone(), &env(), "dev").unwrap();
        assert_eq!(ctx.url(), Some("https://auth.test/oauth/token"));

        let no_token_uri = EnvironmentConfig {
            token_uri: None,
            ..env()
        };
        let err = ctx.select_api(TOKEN_API, token, &no_token_uri, "dev").unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::MissingEnvironmentSetting {
                setting: "token_uri",
                ..
            }
        ));
    }

    #[test]
    fn test_apply_dataset_resolves_templates() {
        let mut ctx = ScenarioContext::new();
        ctx.select_api("create_user", user_schema(), &env(), "dev").unwrap();

        let row = DataRow::from_pairs("TC01", [("user_id", json!("42")), ("verbose", json!(true))]);
        let expected = ExpectedValues::from(&row);
        ctx.apply_dataset(&row, expected, &TemplateEngine::new(), PlaceholderPolicy::Lenient)
            .unwrap();

        assert_eq!(ctx.body(), Some(&json!({"id": "42"})));
        assert_eq!(ctx.query(), Some(&json!({"verbose": true})));
        assert!(ctx.expected().is_some());
    }

    #[test]
    fn test_apply_dataset_strict_rejects_unresolved() {
        let mut ctx = ScenarioContext::new();
        ctx.select_api("create_user", user_schema(), &env(), "dev").unwrap();

        let row = DataRow::from_pairs("TC01", [("user_id", json!("42"))]);
        let err = ctx
            .apply_dataset(
                &row,
                ExpectedValues::default(),
                &TemplateEngine::new(),
                PlaceholderPolicy::Strict,
            )
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Template(_)));
    }

    #[test]
    fn test_apply_dataset_requires_api() {
        let mut ctx = ScenarioContext::new();
        let row = DataRow::from_pairs("TC01", [("user_id", json!("42"))]);
        let err = ctx
            .apply_dataset(
                &row,
                ExpectedValues::default(),
                &TemplateEngine::new(),
                PlaceholderPolicy::Lenient,
            )
            .unwrap_err();
        assert!(matches!(err, ScenarioError::NoApiSelected { .. }));
    }

    #[test]
    fn test_build_request_for_regular_api() {
        let mut ctx = ScenarioContext::new();
        ctx.select_api("create_user", user_schema(), &env(), "dev").unwrap();
        let row = DataRow::from_pairs("TC01", [("user_id", json!("42"))]);
        ctx.apply_dataset(
            &row,
            ExpectedValues::default(),
            &TemplateEngine::new(),
            PlaceholderPolicy::Lenient,
        )
        .unwrap();

        let request = ctx.build_request(HttpMethod::Post, &env(), "dev").unwrap();
        assert_eq!(request.url, "https://api.test/users");
        assert_eq!(request.body, RequestBody::Json(json!({"id": "42"})));
        assert_eq!(request.basic_auth.as_ref().unwrap().username, "u");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.query, None);
    }

    #[test]
    fn test_build_request_for_token_api() {
        let mut ctx = ScenarioContext::new();
        let token = schema(json!({
            "base_path": "/token",
            "request": {"grant_type": "(grant_type)"}
        }));
        ctx.select_api(TOKEN_API, token, &env(), "dev").unwrap();
        let row = DataRow::from_pairs("TC01", [("grant_type", json!("client_credentials"))]);
        ctx.apply_dataset(
            &row,
            ExpectedValues::default(),
            &TemplateEngine::new(),
            PlaceholderPolicy::Lenient,
        )
        .unwrap();

        let request = ctx.build_request(HttpMethod::Post, &env(), "dev").unwrap();
        // base64("client:secret")
        assert_eq!(request.header("Authorization"), Some("Basic Y2xpZW50OnNlY3JldA=="));
        assert_eq!(
            request.body,
            RequestBody::Form(json!({"grant_type": "client_credentials"}))
        );
    }

    #[test]
    fn test_saved_token_becomes_bearer() {
        let mut ctx = ScenarioContext::new();
        ctx.set_response(ApiResponse::new(
            200,
            json!({"access_token": "abc123", "expires_in": 3600}),
            Duration::ZERO,
        ));
        ctx.save_access_token().unwrap();
        assert_eq!(ctx.access_token(), Some("abc123"));

        ctx.select_api("create_user", user_schema(), &env(), "dev").unwrap();
        let request = ctx.build_request(HttpMethod::Get, &env(), "dev").unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer abc123"));
    }

    #[test]
    fn test_save_access_token_errors() {
        let mut ctx = ScenarioContext::new();
        assert!(matches!(
            ctx.save_access_token().unwrap_err(),
            ScenarioError::NoResponse { .. }
        ));

        ctx.set_response(ApiResponse::new(200, json!({"token": "x"}), Duration::ZERO));
        assert!(matches!(
            ctx.save_access_token().unwrap_err(),
            ScenarioError::MissingAccessToken
        ));
    }

    #[test]
    fn test_clear_api_keeps_response_and_token() {
        let mut ctx = ScenarioContext::new();
        ctx.select_api("create_user", user_schema(), &env(), "dev").unwrap();
        ctx.set_response(ApiResponse::new(200, json!({"access_token": "t"}), Duration::ZERO));
        ctx.save_access_token().unwrap();

        ctx.clear_api();
        assert_eq!(ctx.api(), None);
        assert_eq!(ctx.body(), None);
        assert!(ctx.response().is_some());
        assert_eq!(ctx.access_token(), Some("t"));
    }
}
