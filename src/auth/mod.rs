//! Session acquisition
//!
//! - [`login`] -- email/password login and registration
//! - [`oauth`] -- completing a social login from the OAuth redirect URL
//!
//! Both flows end the same way: the token is persisted, attached to the
//! API client, a [`SessionEvent::LoggedIn`](crate::session::SessionEvent)
//! is broadcast, and after a fixed delay an [`AuthOutcome`] names where the
//! user goes next. Neither flow retries.

pub mod login;
pub mod oauth;

use std::time::Duration;

use crate::api::types::User;
use crate::config::Config;
use crate::session::Session;

pub use login::AuthService;
pub use oauth::{parse_callback_fragment, CallbackFragment, OAuthCallback};

/// Result of a successful session acquisition
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The stored session
    pub session: Session,
    /// User returned by the backend, when it sent one
    pub user: Option<User>,
    /// Where to go after the redirect delay
    pub navigate_to: String,
}

/// Post-login behaviour shared by both flows
#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    /// Fixed pause before navigating
    pub delay: Duration,
    /// Navigation target
    pub target: String,
}

impl RedirectPolicy {
    /// Build from the `session` configuration section.
    pub fn from_config(config: &Config) -> Self {
        Self {
            delay: config.redirect_delay(),
            target: config.session.dashboard_url.clone(),
        }
    }

    /// No delay; used by tests.
    pub fn immediate(target: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            target: target.into(),
        }
    }

    pub(crate) async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
