//! Error types for Linkrec
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::analyzer::PipelineStage;

/// Main error type for Linkrec operations
///
/// Every failure is absorbed at the command boundary and rendered as a
/// single user-facing message (see [`user_message`]). Nothing is retried.
#[derive(Error, Debug)]
pub enum LinkrecError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected locally before any request was issued
    #[error("{0}")]
    Validation(String),

    /// An operation that needs a session was attempted without one
    #[error("Not logged in. Run `linkrec login` first")]
    NotAuthenticated,

    /// The backend answered with a non-success status
    #[error("API error ({status}){}", message_suffix(.message))]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Server-supplied message; empty when the body carried none
        message: String,
    },

    /// A session-issuing endpoint answered without a token
    #[error("Server response did not include a session token")]
    MissingToken,

    /// Backend unreachable or reporting itself unavailable (502/503/504)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// OAuth redirect could not be turned into a session
    #[error("OAuth callback error: {0}")]
    OAuthCallback(String),

    /// One stage of the extract/analyze/recommend pipeline failed
    #[error("{stage} failed: {message}")]
    Pipeline {
        /// Stage that failed; later stages were not attempted
        stage: PipelineStage,
        /// Failure description
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

fn message_suffix(message: &str) -> String {
    if message.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

/// Result type alias for Linkrec operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

/// Render an error as the single line shown to the user.
///
/// Service outages get a dedicated message; API errors show the server's
/// message; anything that is not a [`LinkrecError`] falls back to
/// `fallback`.
///
/// # Examples
///
/// ```
/// use linkrec::error::{user_message, LinkrecError};
///
/// let err = anyhow::Error::new(LinkrecError::Api {
///     status: 401,
///     message: "Invalid credentials".to_string(),
/// });
/// assert_eq!(user_message(&err, "Login failed"), "Invalid credentials");
/// ```
pub fn user_message(err: &anyhow::Error, fallback: &str) -> String {
    match err.downcast_ref::<LinkrecError>() {
        Some(LinkrecError::ServiceUnavailable(_)) => {
            "Service is currently unavailable. Please try again later.".to_string()
        }
        Some(LinkrecError::Api { message, .. }) if !message.trim().is_empty() => message.clone(),
        Some(LinkrecError::Api { .. }) => fallback.to_string(),
        Some(LinkrecError::Http(_)) => fallback.to_string(),
        Some(other) => other.to_string(),
        None => fallback.to_string(),
    }
}
