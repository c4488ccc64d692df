//! Linkrec - LinkedIn content analyzer and recommendations client library
//!
//! This library is a typed client for the Linkrec backend: session
//! acquisition (email/password and OAuth callback), profile management, the
//! extract → analyze → recommend content pipeline, and the personalized
//! recommendations feed. All scoring and analysis happen server-side.
//!
//! # Architecture
//!
//! - `api`: HTTP client, endpoint paths and wire types
//! - `session`: bearer token storage and login/logout events
//! - `auth`: login, registration and OAuth callback flows
//! - `profile`: profile read/update and password change
//! - `analyzer`: the three-stage content pipeline
//! - `recommendations`: feed browsing, feedback and bookmarks
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: command-line interface
//!
//! # Example
//!
//! ```no_run
//! use linkrec::{Config, ContentPipeline};
//! use linkrec::api::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let client = ApiClient::from_config(&config.api)?;
//!     let pipeline = ContentPipeline::new(client, config.recommendations.max_generated);
//!     let report = pipeline.run("https://www.linkedin.com/posts/example").await?;
//!     println!("{}", report.analysis.summary);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod profile;
pub mod recommendations;
pub mod session;

// Re-export commonly used types
pub use analyzer::{ContentPipeline, ContentReport, PipelineStage, PipelineState};
pub use api::ApiClient;
pub use auth::{AuthOutcome, AuthService, OAuthCallback, RedirectPolicy};
pub use config::Config;
pub use error::{user_message, LinkrecError, Result};
pub use profile::ProfileService;
pub use recommendations::{CategoryFilter, RecommendationService};
pub use session::{Session, SessionEvent, SessionManager};

#[cfg(test)]
pub mod test_utils;
