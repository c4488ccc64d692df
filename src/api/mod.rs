//! Backend API access
//!
//! - [`client`] -- authenticated JSON HTTP client and error mapping
//! - [`types`]  -- request and response shapes
//!
//! Endpoint paths used by the services live here so every caller agrees
//! on them.

pub mod client;
pub mod types;

pub use client::ApiClient;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";
pub const OAUTH_EXCHANGE_ENDPOINT: &str = "/api/auth/supabase-oauth";
pub const PROFILE_ENDPOINT: &str = "/api/auth/profile";
pub const PASSWORD_ENDPOINT: &str = "/api/auth/password";
pub const BOOKMARKS_ENDPOINT: &str = "/api/bookmarks";
pub const EXTRACT_ENDPOINT: &str = "/api/linkedin/extract";
pub const ANALYZE_ENDPOINT: &str = "/api/linkedin/analyze";
pub const UNIFIED_RECOMMENDATIONS_ENDPOINT: &str = "/api/recommendations/unified";
pub const RECOMMENDATIONS_ENDPOINT: &str = "/api/recommendations";
pub const RECOMMENDATION_FEEDBACK_ENDPOINT: &str = "/api/recommendations/feedback";
