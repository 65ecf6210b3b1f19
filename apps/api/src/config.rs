use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only `PORT` is validated eagerly; everything else has a usable default.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service keeps session blobs in process memory.
    pub redis_url: Option<String>,
    pub store_key_prefix: String,
    /// When unset the embedded university catalog is used.
    pub catalog_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: optional_env("REDIS_URL"),
            store_key_prefix: optional_env("STORE_KEY_PREFIX")
                .unwrap_or_else(|| "admissions".to_string()),
            catalog_path: optional_env("CATALOG_PATH").map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            store_key_prefix: "admissions".to_string(),
            catalog_path: None,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
