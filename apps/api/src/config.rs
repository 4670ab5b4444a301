use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";
const DEFAULT_PRIMARY_MODEL: &str = "gemini-1.5-pro";
const DEFAULT_FALLBACK_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Every value has a default; only a malformed `PORT` fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Local secrets file. Read as part of the deployment secret store and
    /// overwritten by the "save key" action.
    pub secrets_path: PathBuf,
    pub primary_model: String,
    pub fallback_model: String,
    pub gemini_api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            secrets_path: PathBuf::from(env_or("SECRETS_PATH", DEFAULT_SECRETS_PATH)),
            primary_model: env_or("PRIMARY_MODEL", DEFAULT_PRIMARY_MODEL),
            fallback_model: env_or("FALLBACK_MODEL", DEFAULT_FALLBACK_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
