use std::path::Path;

use anyhow::{Context, Result};

use crate::audit::scoring::ScoringConfig;
use crate::llm_client::DEFAULT_MODEL;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or the scoring file is invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
    pub scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let scoring = match std::env::var("SCORING_CONFIG_PATH") {
            Ok(path) => load_scoring_config(Path::new(&path))?,
            Err(_) => ScoringConfig::default(),
        };

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scoring,
        })
    }
}

/// Reads scoring overrides from a JSON file. Absent keys keep their defaults.
pub fn load_scoring_config(path: &Path) -> Result<ScoringConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scoring config '{}'", path.display()))?;
    let config: ScoringConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Scoring config '{}' is not valid JSON", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Scoring config '{}' is inconsistent", path.display()))?;
    Ok(config)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
