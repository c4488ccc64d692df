//! JSON HTTP client for the backend API
//!
//! [`ApiClient`] wraps a `reqwest::Client` with the backend base URL and a
//! shared bearer token. Once a token is set it is attached to every
//! outgoing request, mirroring a globally configured `Authorization`
//! header. Clones share the same token.
//!
//! Failures are mapped onto [`LinkrecError`]:
//!
//! - connection failures, timeouts and `502`/`503`/`504` become
//!   [`LinkrecError::ServiceUnavailable`]
//! - any other non-success status becomes [`LinkrecError::Api`] carrying
//!   the server's `error`, `message` or `detail` text (empty when absent)
//!
//! Requests are issued exactly once; there is no retry.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::ApiConfig;
use crate::error::{LinkrecError, Result};

/// HTTP client bound to one backend.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use linkrec::api::ApiClient;
///
/// # async fn example() -> linkrec::error::Result<()> {
/// let client = ApiClient::new("http://localhost:8000", Duration::from_secs(30))?;
/// client.set_token(Some("session-token".to_string())).await;
/// let profile: serde_json::Value = client.get("/api/auth/profile").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Construct a client for `base_url` with a per-request `timeout`.
    ///
    /// No network I/O is performed at construction time.
    ///
    /// # Errors
    ///
    /// Returns [`LinkrecError::Config`] if the base URL does not parse or
    /// the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url)
            .map_err(|e| LinkrecError::Config(format!("Invalid API base URL {}: {}", base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LinkrecError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Construct a client from the `api` configuration section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_seconds))
    }

    /// Backend base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token attached to outgoing requests.
    ///
    /// `None` removes the header.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Current bearer token, if any
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Fail with [`LinkrecError::NotAuthenticated`] when no token is set.
    pub async fn require_token(&self) -> Result<()> {
        if self.token.read().await.is_some() {
            Ok(())
        } else {
            Err(LinkrecError::NotAuthenticated.into())
        }
    }

    /// GET `path` and decode the JSON body.
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let value = self.request_value::<()>(Method::GET, path, None).await?;
        decode(value, path)
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let value = self.request_value(Method::POST, path, Some(body)).await?;
        decode(value, path)
    }

    /// PUT `body` as JSON to `path` and decode the JSON response.
    pub async fn put<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let value = self.request_value(Method::PUT, path, Some(body)).await?;
        decode(value, path)
    }

    /// Issue a request and return the raw JSON response.
    ///
    /// Empty bodies (e.g. `204 No Content`) are returned as `Value::Null`.
    ///
    /// # Errors
    ///
    /// See the module documentation for the status mapping.
    pub async fn request_value<T>(&self, method: Method, path: &str, body: Option<&T>) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url);

        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "Sending API request");

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                tracing::warn!(%url, error = %e, "Backend unreachable");
                anyhow::Error::new(LinkrecError::ServiceUnavailable(e.to_string()))
            } else {
                anyhow::Error::new(LinkrecError::Http(e))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(LinkrecError::Http)?;
        tracing::trace!(%url, status = status.as_u16(), "API response received");

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|e| {
                LinkrecError::Api {
                    status: status.as_u16(),
                    message: format!("Malformed response from {}: {}", path, e),
                }
                .into()
            });
        }

        Err(status_error(status, &text).into())
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn decode<R>(value: Value, path: &str) -> Result<R>
where
    R: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| {
        LinkrecError::Api {
            status: 200,
            message: format!("Unexpected response shape from {}: {}", path, e),
        }
        .into()
    })
}

/// Map a non-success status and its body onto a [`LinkrecError`].
pub(crate) fn status_error(status: StatusCode, body: &str) -> LinkrecError {
    let message = error_message_from_body(body);

    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            LinkrecError::ServiceUnavailable(message.unwrap_or_else(|| status.to_string()))
        }
        _ => LinkrecError::Api {
            status: status.as_u16(),
            message: message.unwrap_or_default(),
        },
    }
}

/// Pull the human-readable message out of an error body.
///
/// Looks at `error`, `message` and `detail` in that order; a string body
/// under `error.message` is also accepted.
pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| match value.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Object(inner)) => inner
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
}

/// Check a `{"success": false, "error": ...}` envelope and unwrap `data`.
///
/// Some endpoints report failure inside a `200` body; others wrap the
/// payload in `data`. Returns the payload or the envelope's error text.
pub(crate) fn unwrap_envelope(value: Value) -> std::result::Result<Value, String> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = error_message_from_body(&value.to_string())
            .unwrap_or_else(|| "request was not successful".to_string());
        return Err(message);
    }

    match value {
        Value::Object(mut map)
            if map
                .get("data")
                .map(|d| d.is_object() || d.is_array())
                .unwrap_or(false) =>
        {
            Ok(map.remove("data").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

/// Check the envelope of a successful response.
///
/// An unsuccessful envelope becomes [`LinkrecError::Api`] with status 200
/// and the envelope's message, so callers render it like any other server
/// rejection.
pub(crate) fn checked(value: Value) -> Result<Value> {
    unwrap_envelope(value)
        .map_err(|message| anyhow::Error::new(LinkrecError::Api { status: 200, message }))
}

/// Unwrap an envelope and decode its payload as `T`.
pub(crate) fn payload<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(checked(value)?)?)
}
