//! Command handlers for the linkrec CLI
//!
//! Each subcommand builds on a shared [`Context`] holding the configured
//! API client and session manager. Handlers return errors instead of
//! printing them; [`fallback_message`] names the generic line shown when an
//! error carries nothing worth showing.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::RedirectPolicy;
use crate::cli::{Commands, ProfileCommand, RecommendationCommand};
use crate::config::Config;
use crate::error::Result;
use crate::session::{store_for, SessionManager, SessionStore};

pub mod analyze;
pub mod auth;
pub mod notify;
pub mod profile;
pub mod recommendations;

/// Shared state for one CLI invocation
pub struct Context {
    pub config: Config,
    pub session: SessionManager,
}

impl Context {
    /// Build the client and session store from `config` and restore any
    /// stored session.
    ///
    /// An unreadable stored session is logged and treated as logged out, so
    /// `logout`, `login` and `analyze` keep working.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the session store cannot be
    /// built.
    pub async fn new(config: Config) -> Result<Self> {
        let store = store_for(&config.session)?;
        Self::with_store(config, store).await
    }

    /// Same as [`Context::new`] with an explicit store.
    pub async fn with_store(config: Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let client = ApiClient::from_config(&config.api)?;
        let session = SessionManager::new(client, store);
        if let Err(e) = session.restore().await {
            tracing::warn!(error = %e, "Ignoring unreadable stored session");
        }
        Ok(Self { config, session })
    }

    /// The session-aware API client
    pub fn client(&self) -> ApiClient {
        self.session.client().clone()
    }

    /// Post-login redirect behaviour from configuration
    pub fn redirect(&self) -> RedirectPolicy {
        RedirectPolicy::from_config(&self.config)
    }
}

/// Run `command` to completion.
pub async fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            auth::login(ctx, &email, password.as_deref().unwrap_or_default()).await
        }
        Commands::Register {
            name,
            email,
            password,
            confirm,
        } => {
            let password = password.unwrap_or_default();
            let confirm = confirm.unwrap_or_else(|| password.clone());
            auth::register(ctx, &name, &email, &password, &confirm).await
        }
        Commands::OauthCallback { url } => auth::oauth_callback(ctx, &url).await,
        Commands::Logout => auth::logout(ctx).await,
        Commands::Whoami => auth::whoami(ctx).await,
        Commands::Profile { command } => profile::handle_profile(ctx, command).await,
        Commands::Analyze { url, json } => analyze::run_analyze(ctx, &url, json).await,
        Commands::Recommendations { command } => {
            recommendations::handle_recommendations(ctx, command).await
        }
    }
}

/// Generic message for a failed `command`
pub fn fallback_message(command: &Commands) -> &'static str {
    match command {
        Commands::Login { .. } => "Login failed",
        Commands::Register { .. } => "Registration failed",
        Commands::OauthCallback { .. } => "Authentication failed",
        Commands::Logout => "Logout failed",
        Commands::Whoami => "Failed to load session",
        Commands::Profile { command } => match command {
            ProfileCommand::Show { .. } => "Failed to load profile",
            ProfileCommand::Update { .. } => "Failed to update profile",
            ProfileCommand::Password { .. } => "Failed to change password",
        },
        Commands::Analyze { .. } => "Analysis failed",
        Commands::Recommendations { command } => match command {
            RecommendationCommand::List { .. } => "Failed to load recommendations",
            RecommendationCommand::Feedback { .. } => "Failed to send feedback",
            RecommendationCommand::Save { .. } => "Failed to save recommendation",
        },
    }
}
