// # Request Doer
//
// Transport seam of the API client.
//
// Every typed operation goes through two steps:
// 1. `new_request`: validate and resolve method, path and body (no I/O)
// 2. `do_request`: perform exactly one HTTP round trip and hand back the
//    decoded JSON body
//
// Splitting them lets tests observe the method/path/body of every call and
// inject construction failures without a network.
//
// ## Constraints
//
// - ❌ NO retry logic
// - ❌ NO caching
// - ❌ NO pagination loop (one page, one round trip)

use reqwest::Method;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

use crate::error::{Error, Result};

/// Base URL of the Pivotal Tracker REST API v5
pub const DEFAULT_BASE_URL: &str = "https://www.pivotaltracker.com/services/v5/";

/// HTTP timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the access token
pub const TOKEN_HEADER: &str = "X-TrackerToken";

/// A request that passed construction and is ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `projects/1234`
    pub path: String,
    /// Fully resolved URL
    pub url: String,
    /// JSON body for write operations
    pub body: Option<Value>,
}

/// Builds and executes API requests
pub trait RequestDoer: Send + Sync {
    /// Validate and resolve a request without touching the network
    fn new_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiRequest>;

    /// Execute one request
    ///
    /// Returns the decoded JSON body, or `Value::Null` when the service sent
    /// none (e.g. `204 No Content` on delete).
    fn do_request(&self, request: ApiRequest) -> Result<Value>;
}

/// reqwest-backed [`RequestDoer`]
pub struct HttpRequestDoer {
    /// API access token
    /// ⚠️ NEVER log this value
    token: String,
    base_url: Url,
    http: reqwest::blocking::Client,
}

// Custom Debug implementation that hides the access token
impl std::fmt::Debug for HttpRequestDoer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequestDoer")
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpRequestDoer {
    /// Create a doer for `base_url` authenticated with `token`
    ///
    /// # Errors
    ///
    /// `Error::Request` if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(token: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::request(format!("invalid base URL {base_url}: {e}")))?;

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tracker-pt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            token: token.into(),
            base_url,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

impl RequestDoer for HttpRequestDoer {
    fn new_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiRequest> {
        if path.starts_with('/') {
            return Err(Error::request(format!(
                "path must be relative to the API base: {path}"
            )));
        }

        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::request(format!("invalid path {path}: {e}")))?;

        Ok(ApiRequest {
            method,
            path: path.to_string(),
            url: url.to_string(),
            body,
        })
    }

    fn do_request(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!("Tracker API request: {} {}", request.method, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .header(TOKEN_HEADER, &self.token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| Error::transport(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::debug!(
                "Tracker API error: {} {} -> {}",
                request.method,
                request.path,
                status
            );
            return Err(Error::Status {
                status: status.as_u16(),
                message: describe_failure(status.as_u16(), &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| Error::decode(e.to_string()))
    }
}

/// Human-readable message for a non-2xx response
///
/// The service reports failures as `{"kind": "error", "code": ..., "error": ...}`,
/// sometimes with a `general_problem` elaboration.
fn describe_failure(status: u16, body: &str) -> String {
    let reported = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        let error = json.get("error")?.as_str()?.to_string();
        match json.get("general_problem").and_then(Value::as_str) {
            Some(problem) => Some(format!("{error} {problem}")),
            None => Some(error),
        }
    });

    match (status, reported) {
        (_, Some(message)) => message,
        (401 | 403, None) => "Authentication failed: invalid access token or insufficient permissions".to_string(),
        (404, None) => "Resource not found".to_string(),
        (429, None) => "Rate limit exceeded".to_string(),
        (500..=599, None) => format!("Tracker server error: {}", body.trim()),
        (_, None) => body.trim().to_string(),
    }
}
