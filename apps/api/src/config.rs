use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Per-store entry bound for the screening cache.
    pub cache_capacity: u64,
    /// Idle TTL in seconds before a cached result is evicted.
    pub cache_idle_secs: u64,
    /// Fixed anchor for "present" in tenure calculations. Unset means today;
    /// set SIFT_REFERENCE_DATE (YYYY-MM-DD) for reproducible runs.
    pub reference_date: Option<NaiveDate>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cache_capacity: std::env::var("SIFT_CACHE_CAPACITY")
                .unwrap_or_else(|_| "4096".to_string())
                .parse::<u64>()
                .context("SIFT_CACHE_CAPACITY must be a number")?,
            cache_idle_secs: std::env::var("SIFT_CACHE_IDLE_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .context("SIFT_CACHE_IDLE_SECS must be a number")?,
            reference_date: match std::env::var("SIFT_REFERENCE_DATE") {
                Ok(value) => Some(
                    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                        .context("SIFT_REFERENCE_DATE must be YYYY-MM-DD")?,
                ),
                Err(_) => None,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
