use anyhow::{Context, Result};

pub const DEFAULT_WORDPRESS_API_URL: &str = "https://example.com/wp-json/wp/v2/job-listings";

/// Application configuration loaded from environment variables.
/// Every option has a default; malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub wordpress_api_url: String,
    pub max_requests_per_minute: u32,
    /// Reported by the health check only.
    pub environment: String,
    pub rust_log: String,
    /// Key rate limits on `X-Forwarded-For` / `X-Real-IP` instead of the peer
    /// address. Only safe when a proxy in front rewrites those headers.
    pub trust_proxy: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            wordpress_api_url: optional_env("WORDPRESS_API_URL")
                .unwrap_or_else(|| DEFAULT_WORDPRESS_API_URL.to_string()),
            max_requests_per_minute: std::env::var("MAX_REQUESTS_PER_MINUTE")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u32>()
                .context("MAX_REQUESTS_PER_MINUTE must be a non-negative integer")?,
            environment: optional_env("NODE_ENV").unwrap_or_else(|| "development".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            trust_proxy: optional_env("TRUST_PROXY").is_some_and(|v| parse_flag(&v)),
        })
    }
}

/// Reads an env var, treating an empty value the same as a missing one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
