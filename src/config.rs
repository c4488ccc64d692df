//! Configuration management for Linkrec
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, LinkrecError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Linkrec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session persistence and post-login behaviour
    #[serde(default)]
    pub session: SessionConfig,
    /// Recommendation feed and generation settings
    #[serde(default)]
    pub recommendations: RecommendationsConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://api.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Where the session token is persisted between invocations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    /// OS native credential store
    #[default]
    Keyring,
    /// JSON file under the user's config directory
    File,
    /// Process memory only; the session is lost on exit
    Memory,
}

impl std::str::FromStr for SessionBackend {
    type Err = LinkrecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyring" => Ok(SessionBackend::Keyring),
            "file" => Ok(SessionBackend::File),
            "memory" => Ok(SessionBackend::Memory),
            other => Err(LinkrecError::Config(format!(
                "Unknown session backend: {}. Use keyring, file, or memory",
                other
            ))),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage backend for the session token
    #[serde(default)]
    pub backend: SessionBackend,

    /// Explicit path for the `file` backend; defaults to the platform
    /// config directory
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Fixed pause between a successful login and navigation (milliseconds)
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,

    /// Where the user is sent after login
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
}

fn default_redirect_delay_ms() -> u64 {
    1000
}

fn default_dashboard_url() -> String {
    "/dashboard".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            file_path: None,
            redirect_delay_ms: default_redirect_delay_ms(),
            dashboard_url: default_dashboard_url(),
        }
    }
}

/// Recommendations configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    /// Number of items requested from the feed when `--limit` is absent
    #[serde(default = "default_feed_limit")]
    pub default_limit: usize,

    /// Upper bound sent to unified generation in the analyzer pipeline
    #[serde(default = "default_max_generated")]
    pub max_generated: usize,
}

fn default_feed_limit() -> usize {
    20
}

fn default_max_generated() -> usize {
    10
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_feed_limit(),
            max_generated: default_max_generated(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LinkrecError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| LinkrecError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("LINKREC_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("LINKREC_API_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid LINKREC_API_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(backend) = std::env::var("LINKREC_SESSION_BACKEND") {
            match backend.parse() {
                Ok(value) => self.session.backend = value,
                Err(_) => tracing::warn!("Invalid session backend: {}, keeping {:?}", backend, self.session.backend),
            }
        }

        if let Ok(file) = std::env::var("LINKREC_SESSION_FILE") {
            self.session.file_path = Some(PathBuf::from(file));
        }

        if let Ok(delay) = std::env::var("LINKREC_REDIRECT_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.session.redirect_delay_ms = value;
            } else {
                tracing::warn!("Invalid LINKREC_REDIRECT_DELAY_MS: {}", delay);
            }
        }

        if let Ok(dashboard) = std::env::var("LINKREC_DASHBOARD_URL") {
            self.session.dashboard_url = dashboard;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_url) = &cli.api_url {
            self.api.base_url = api_url.clone();
        }
        if let Some(backend) = cli.session_backend {
            self.session.backend = backend;
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `LinkrecError::Config` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            LinkrecError::Config(format!("Invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LinkrecError::Config(format!(
                "api.base_url must use http or https, got {}",
                parsed.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(
                LinkrecError::Config("api.timeout_seconds must be greater than 0".to_string())
                    .into(),
            );
        }

        if self.session.dashboard_url.trim().is_empty() {
            return Err(
                LinkrecError::Config("session.dashboard_url cannot be empty".to_string()).into(),
            );
        }

        if self.recommendations.default_limit == 0 || self.recommendations.max_generated == 0 {
            return Err(LinkrecError::Config(
                "recommendation limits must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Post-login pause as a [`std::time::Duration`]
    pub fn redirect_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.session.redirect_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            recommendations: RecommendationsConfig::default(),
        }
    }
}
