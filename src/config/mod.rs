//! Configuration module for the INHELP backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default OpenAI-compatible endpoint of the Gemini API.
pub const DEFAULT_MATCHER_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";

pub const DEFAULT_MATCHER_MODEL: &str = "gemini-2.5-flash";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file backing local fallback storage
    pub db_path: PathBuf,
    /// Remote document endpoint (spreadsheet web app); None disables remote sync
    pub remote_url: Option<String>,
    /// API key of the natural-language matcher; None disables smart search
    pub matcher_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible matcher API
    pub matcher_base_url: String,
    /// Model name sent to the matcher
    pub matcher_model: String,
    /// Static admin username
    pub admin_username: String,
    /// Static admin password
    pub admin_password: String,
    /// Timeout for outbound HTTP calls
    pub http_timeout: Duration,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("INHELP_DB_PATH")
            .unwrap_or_else(|_| "./data/inhelp.sqlite".to_string())
            .into();

        let remote_url = non_empty_var("INHELP_REMOTE_URL");
        let matcher_api_key = non_empty_var("INHELP_MATCHER_API_KEY");

        let matcher_base_url = env::var("INHELP_MATCHER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_MATCHER_BASE_URL.to_string());
        let matcher_model =
            env::var("INHELP_MATCHER_MODEL").unwrap_or_else(|_| DEFAULT_MATCHER_MODEL.to_string());

        let admin_username =
            env::var("INHELP_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            env::var("INHELP_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        let http_timeout = env::var("INHELP_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15));

        let bind_addr = env::var("INHELP_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid INHELP_BIND_ADDR format");

        let log_level = env::var("INHELP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            remote_url,
            matcher_api_key,
            matcher_base_url,
            matcher_model,
            admin_username,
            admin_password,
            http_timeout,
            bind_addr,
            log_level,
        }
    }
}

/// Read an env var, treating blank values as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
