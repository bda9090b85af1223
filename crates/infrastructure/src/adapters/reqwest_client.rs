//! HTTP client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It owns the wire details:
//! query-string encoding, JSON and form bodies, basic authentication and
//! decoding of the response body.

use std::future::Future;
use std::time::{Duration, Instant};

use caliper_application::ports::{HttpClient, HttpClientError};
use caliper_domain::value::stringify;
use caliper_domain::{ApiRequest, ApiResponse, HttpMethod, RequestBody};
use indexmap::IndexMap;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client implementation using reqwest.
pub struct ReqwestHttpClient {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a client whose requests time out after `timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(timeout_ms: u64) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("Caliper/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout_ms })
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Parses the URL and appends the query string.
    ///
    /// A query that contains `:` once rendered is appended verbatim;
    /// otherwise it is form-urlencoded. Query parameters must be an object.
    fn build_url(request: &ApiRequest) -> Result<Url, HttpClientError> {
        let mut url = Url::parse(&request.url).map_err(|e| HttpClientError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let Some(params) = request.query.as_ref().filter(|q| !q.is_null()) else {
            return Ok(url);
        };
        let pairs = form_pairs(params)?;
        let raw = request.raw_query_string().unwrap_or_default();
        let query = if raw.contains(':') {
            raw
        } else {
            serde_urlencoded::to_string(pairs)
                .map_err(|e| HttpClientError::InvalidBody(format!("Failed to encode query: {e}")))?
        };
        if !query.is_empty() {
            let joined = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                _ => query,
            };
            url.set_query(Some(&joined));
        }
        Ok(url)
    }

    fn build_body(
        builder: reqwest::RequestBuilder,
        request: &ApiRequest,
    ) -> Result<reqwest::RequestBuilder, HttpClientError> {
        match &request.body {
            RequestBody::None => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(value)),
            RequestBody::Form(value) => {
                let encoded = serde_urlencoded::to_string(form_pairs(value)?)
                    .map_err(|e| HttpClientError::InvalidBody(format!("Failed to encode form: {e}")))?;
                let builder = if request.header("Content-Type").is_none() {
                    builder.header("Content-Type", FORM_CONTENT_TYPE)
                } else {
                    builder
                };
                Ok(builder.body(encoded))
            }
        }
    }

    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            return HttpClientError::ConnectionFailed(error.to_string());
        }
        HttpClientError::Other(error.to_string())
    }
}

/// Flattens an object into `(key, string value)` pairs.
fn form_pairs(value: &Value) -> Result<Vec<(String, String)>, HttpClientError> {
    match value {
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), stringify(v))).collect()),
        other => Err(HttpClientError::InvalidBody(format!(
            "form and query parameters must be an object, got {other}"
        ))),
    }
}

/// Decodes a response body: empty is `Null`, JSON is parsed, anything else
/// is kept as a string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        debug!(error = %e, "Response body is not JSON, keeping it as text");
        Value::String(String::from_utf8_lossy(bytes).into_owned())
    })
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, HttpClientError>> + Send {
        let request = request.clone();
        let timeout_ms = self.timeout_ms;

        async move {
            let url = Self::build_url(&request)?;
            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url)
                .timeout(Duration::from_millis(timeout_ms));

            // Basic credentials replace any Authorization header.
            for (name, value) in &request.headers {
                if request.basic_auth.is_some() && name.eq_ignore_ascii_case("authorization") {
                    continue;
                }
                builder = builder.header(name, value);
            }
            if let Some(auth) = &request.basic_auth {
                builder = builder.basic_auth(&auth.username, Some(&auth.password));
            }
            builder = Self::build_body(builder, &request)?;

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();
            let headers: IndexMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;
            let duration = start.elapsed();

            let mut api_response = ApiResponse::new(status, decode_body(&bytes), duration);
            api_response.headers = headers;
            Ok(api_response)
        }
    }
}
