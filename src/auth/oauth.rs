//! Completing a social login from the OAuth redirect
//!
//! The identity provider redirects the browser to a callback URL whose
//! *fragment* (not query string) carries the provider's tokens:
//!
//! ```text
//! https://app.example.com/auth/callback#access_token=...&refresh_token=...&expires_in=3600
//! ```
//!
//! [`OAuthCallback::handle`] takes that URL, exchanges the provider
//! `access_token` at `/api/auth/supabase-oauth` for a backend session
//! token, stores it, warms the profile, broadcasts the login and waits the
//! redirect delay before returning the navigation target.

use serde_json::Value;
use url::Url;

use crate::api::client::payload;
use crate::api::types::{AuthResponse, OAuthExchangeRequest, User};
use crate::api::{OAUTH_EXCHANGE_ENDPOINT, PROFILE_ENDPOINT};
use crate::auth::{AuthOutcome, RedirectPolicy};
use crate::error::{LinkrecError, Result};
use crate::session::{SessionEvent, SessionManager};

/// Tokens carried in the callback fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFragment {
    /// Identity provider access token to exchange
    pub access_token: String,
    /// Provider refresh token; not used by the exchange
    pub refresh_token: Option<String>,
    /// Provider token lifetime in seconds
    pub expires_in: Option<u64>,
}

/// Parse the tokens out of a callback URL's fragment.
///
/// Accepts a full URL or a bare fragment starting with `#`. The query
/// string is ignored.
///
/// # Errors
///
/// Returns [`LinkrecError::OAuthCallback`] when there is no fragment, the
/// provider reported an error, or `access_token` is missing or empty.
///
/// # Examples
///
/// ```
/// use linkrec::auth::parse_callback_fragment;
///
/// let fragment = parse_callback_fragment(
///     "https://app.example.com/auth/callback#access_token=abc&expires_in=3600",
/// )
/// .unwrap();
/// assert_eq!(fragment.access_token, "abc");
/// assert_eq!(fragment.expires_in, Some(3600));
///
/// assert!(parse_callback_fragment("https://app.example.com/auth/callback?access_token=abc").is_err());
/// ```
pub fn parse_callback_fragment(callback: &str) -> Result<CallbackFragment> {
    let callback = callback.trim();
    let fragment = match callback.strip_prefix('#') {
        Some(bare) => bare.to_string(),
        None => Url::parse(callback)
            .map_err(LinkrecError::Url)?
            .fragment()
            .map(str::to_string)
            .unwrap_or_default(),
    };

    if fragment.is_empty() {
        return Err(LinkrecError::OAuthCallback(
            "No authentication data found in callback URL".to_string(),
        )
        .into());
    }

    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse().ok(),
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(LinkrecError::OAuthCallback(error_description.unwrap_or(error)).into());
    }

    let access_token = access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
        LinkrecError::OAuthCallback("No access token found in callback URL".to_string())
    })?;

    Ok(CallbackFragment {
        access_token,
        refresh_token,
        expires_in,
    })
}

/// Turns an OAuth redirect into a backend session.
pub struct OAuthCallback {
    session: SessionManager,
    redirect: RedirectPolicy,
}

impl OAuthCallback {
    /// Create the handler over an existing session manager.
    pub fn new(session: SessionManager, redirect: RedirectPolicy) -> Self {
        Self { session, redirect }
    }

    /// Complete the login described by `callback_url`.
    ///
    /// Nothing is sent to the backend unless the fragment yields an
    /// `access_token`. A failed profile fetch is logged and tolerated; a
    /// failed exchange ends the flow.
    pub async fn handle(&self, callback_url: &str) -> Result<AuthOutcome> {
        let fragment = parse_callback_fragment(callback_url)?;
        tracing::info!("Exchanging OAuth access token for a session");

        let request = OAuthExchangeRequest {
            access_token: fragment.access_token,
        };
        let value: Value = self
            .session
            .client()
            .post(OAUTH_EXCHANGE_ENDPOINT, &request)
            .await?;
        let response: AuthResponse = payload(value)?;

        let token = response.token.filter(|t| !t.is_empty()).ok_or_else(|| {
            LinkrecError::OAuthCallback("No session token received from server".to_string())
        })?;

        let hinted_email = response
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .filter(|e| !e.is_empty());
        let session = self.session.establish(&token, hinted_email).await?;

        let profile = self
            .session
            .client()
            .get::<Value>(PROFILE_ENDPOINT)
            .await
            .and_then(payload::<User>);
        let user = match profile {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load profile after OAuth login");
                response.user
            }
        };

        let email = user
            .as_ref()
            .map(|u| u.email.clone())
            .filter(|e| !e.is_empty())
            .or_else(|| session.email.clone());
        self.session.notify(SessionEvent::LoggedIn { email });

        self.redirect.wait().await;

        Ok(AuthOutcome {
            session,
            user,
            navigate_to: self.redirect.target.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_full_url() {
        let fragment = parse_callback_fragment(
            "https://app.example.com/auth/callback#access_token=abc&refresh_token=r1&expires_in=3600&token_type=bearer",
        )
        .unwrap();
        assert_eq!(fragment.access_token, "abc");
        assert_eq!(fragment.refresh_token.as_deref(), Some("r1"));
        assert_eq!(fragment.expires_in, Some(3600));
    }

    #[test]
    fn test_parse_fragment_bare_hash() {
        let fragment = parse_callback_fragment("#access_token=xyz").unwrap();
        assert_eq!(fragment.access_token, "xyz");
    }

    #[test]
    fn test_parse_fragment_decodes_percent_encoding() {
        let fragment = parse_callback_fragment("#access_token=a%2Bb%3D").unwrap();
        assert_eq!(fragment.access_token, "a+b=");
    }

    #[test]
    fn test_query_string_token_is_ignored() {
        let err = parse_callback_fragment("https://app.example.com/cb?access_token=abc")
            .unwrap_err()
            .to_string();
        assert!(err.contains("No authentication data"));
    }

    #[test]
    fn test_fragment_without_access_token() {
        let err = parse_callback_fragment("https://app.example.com/cb#refresh_token=r")
            .unwrap_err()
            .to_string();
        assert!(err.contains("No access token"));
    }

    #[test]
    fn test_empty_access_token_is_rejected() {
        assert!(parse_callback_fragment("#access_token=").is_err());
    }

    #[test]
    fn test_provider_error_is_surfaced() {
        let err = parse_callback_fragment(
            "https://app.example.com/cb#error=access_denied&error_description=User+cancelled",
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("User cancelled"));
    }

    #[test]
    fn test_invalid_url_is_error() {
        assert!(parse_callback_fragment("not a url").is_err());
    }
}
