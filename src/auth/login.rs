//! Email/password login and registration

use serde_json::Value;

use crate::api::client::payload;
use crate::api::types::{AuthResponse, LoginRequest, RegisterRequest};
use crate::api::{LOGIN_ENDPOINT, REGISTER_ENDPOINT};
use crate::auth::{AuthOutcome, RedirectPolicy};
use crate::error::{LinkrecError, Result};
use crate::session::{SessionEvent, SessionManager};

/// Drives the login, registration and logout flows.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use linkrec::api::ApiClient;
/// use linkrec::auth::{AuthService, RedirectPolicy};
/// use linkrec::session::{MemorySessionStore, SessionManager};
///
/// # async fn example() -> linkrec::error::Result<()> {
/// let client = ApiClient::new("http://localhost:8000", Duration::from_secs(30))?;
/// let session = SessionManager::new(client, Arc::new(MemorySessionStore::default()));
/// let auth = AuthService::new(session, RedirectPolicy::immediate("/dashboard"));
/// let outcome = auth.login("ada@example.com", "hunter2").await?;
/// println!("Go to {}", outcome.navigate_to);
/// # Ok(())
/// # }
/// ```
pub struct AuthService {
    session: SessionManager,
    redirect: RedirectPolicy,
}

impl AuthService {
    /// Create the service over an existing session manager.
    pub fn new(session: SessionManager, redirect: RedirectPolicy) -> Self {
        Self { session, redirect }
    }

    /// Log in with email and password.
    ///
    /// Both fields must be non-empty after trimming; nothing else is
    /// checked locally. Empty input fails before any request is sent.
    ///
    /// # Errors
    ///
    /// - [`LinkrecError::Validation`] for empty fields
    /// - [`LinkrecError::Api`] with the server's message on rejection
    /// - [`LinkrecError::MissingToken`] when the response has no token
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(LinkrecError::Validation("Please fill in all fields".to_string()).into());
        }

        tracing::info!(email, "Logging in");
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let value: Value = self
            .session
            .client()
            .post(LOGIN_ENDPOINT, &request)
            .await?;
        let response: AuthResponse = payload(value)?;

        self.complete(response, email).await
    }

    /// Create an account, then log in.
    ///
    /// All fields must be non-empty and `password` must equal `confirm`.
    /// When the registration response carries no token a regular login is
    /// performed with the same credentials.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<AuthOutcome> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(LinkrecError::Validation("Please fill in all fields".to_string()).into());
        }
        if password != confirm {
            return Err(LinkrecError::Validation("Passwords do not match".to_string()).into());
        }

        tracing::info!(email, "Registering account");
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let value: Value = self
            .session
            .client()
            .post(REGISTER_ENDPOINT, &request)
            .await?;
        let response: AuthResponse = payload(value)?;

        if response.token.as_deref().map(str::is_empty).unwrap_or(true) {
            tracing::debug!("Registration returned no token, logging in");
            return self.login(email, password).await;
        }

        self.complete(response, email).await
    }

    /// Forget the stored session.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await
    }

    async fn complete(&self, response: AuthResponse, email: &str) -> Result<AuthOutcome> {
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or(LinkrecError::MissingToken)?;

        let email = response
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| email.to_string());

        let session = self.session.establish(&token, Some(email.clone())).await?;
        self.session.notify(SessionEvent::LoggedIn { email: Some(email) });

        self.redirect.wait().await;

        Ok(AuthOutcome {
            session,
            user: response.user,
            navigate_to: self.redirect.target.clone(),
        })
    }
}
