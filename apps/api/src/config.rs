use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails with context if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted record store (document collections API).
    pub record_store_url: String,
    pub record_store_token: String,
    /// Upload endpoint of the hosted media manager.
    pub media_upload_url: String,
    pub media_token: String,
    /// Base URL of the external member-identity service.
    pub identity_url: String,
    /// Public base URL of this deployment, used to build verification links.
    pub public_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            record_store_url: require_env("RECORD_STORE_URL")?,
            record_store_token: require_env("RECORD_STORE_TOKEN")?,
            media_upload_url: require_env("MEDIA_UPLOAD_URL")?,
            media_token: require_env("MEDIA_TOKEN")?,
            identity_url: require_env("IDENTITY_URL")?,
            public_base_url: require_env("PUBLIC_BASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
