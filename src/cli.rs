//! Command-line interface definition for Linkrec
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication, profile management, content
//! analysis and the recommendations feed.

use clap::{Parser, Subcommand};

use crate::api::types::FeedbackKind;
use crate::config::SessionBackend;

/// Linkrec - LinkedIn content analyzer and learning recommendations client
#[derive(Parser, Debug, Clone)]
#[command(name = "linkrec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the backend base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Override the session storage backend (keyring, file, memory)
    #[arg(long)]
    pub session_backend: Option<SessionBackend>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Linkrec
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(short, long, default_value = "")]
        email: String,

        /// Account password
        #[arg(short, long, env = "LINKREC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Account email
        #[arg(short, long, default_value = "")]
        email: String,

        /// Account password
        #[arg(short, long, env = "LINKREC_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Password confirmation; defaults to the password itself
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Complete a social login from the redirect URL the browser landed on
    OauthCallback {
        /// Full redirect URL including the `#access_token=...` fragment
        url: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the current session and profile
    Whoami,

    /// Manage the user profile
    Profile {
        /// Profile subcommand
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Extract, analyze and get recommendations for a LinkedIn post
    Analyze {
        /// LinkedIn post URL
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse and act on recommendations
    #[command(alias = "recs")]
    Recommendations {
        /// Recommendations subcommand
        #[command(subcommand)]
        command: RecommendationCommand,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Show the profile
    Show {
        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update profile fields; only supplied fields are sent
    Update {
        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,

        /// New bio
        #[arg(long)]
        bio: Option<String>,
    },

    /// Change the account password
    Password {
        /// Current password
        #[arg(long, default_value = "")]
        current: String,

        /// New password
        #[arg(long, default_value = "")]
        new: String,

        /// New password again
        #[arg(long, default_value = "")]
        confirm: String,
    },
}

/// Recommendation subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RecommendationCommand {
    /// List recommendations, optionally for one category
    List {
        /// Category to filter by; omit or use "all" for everything
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of items
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send feedback about a recommendation
    Feedback {
        /// Recommendation identifier
        id: String,

        /// Feedback kind (relevant, not_relevant, saved, clicked)
        #[arg(short, long)]
        kind: FeedbackKind,

        /// Optional free-text comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Save a recommendation as a bookmark
    Save {
        /// Recommendation identifier
        id: String,

        /// Category the item is looked up in
        #[arg(short, long)]
        category: Option<String>,

        /// How many recommendations to search for the id (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            api_url: None,
            session_backend: None,
            command: Commands::Whoami,
        }
    }
}
