use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Application configuration loaded from environment variables.
/// Every variable has a default; a missing API key only disables the AI operations.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub anthropic_api_key: Option<String>,
    pub generation_model: String,
    pub extraction_model: String,
    pub llm_timeout_secs: u64,
    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let generation_model = var_or("LLM_MODEL", DEFAULT_MODEL);
        let extraction_model = var("LLM_EXTRACTION_MODEL").unwrap_or_else(|| generation_model.clone());

        Ok(Config {
            data_dir: PathBuf::from(var_or("DATA_DIR", "data")),
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            generation_model,
            extraction_model,
            llm_timeout_secs: var_or("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            cors_origins: var_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var_or("RUST_LOG", "info"),
        })
    }
}
