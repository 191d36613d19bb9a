//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub llm: LlmConfig,
    pub weather: WeatherConfig,
    pub server: ServerConfig,
    pub normalizer: NormalizerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub api_key_env: String,
    /// OpenWeatherMap units parameter; "metric" gives Celsius.
    pub units: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NormalizerConfig {
    /// When true, rewrite rules are re-applied until a fixed point
    /// (bounded by `max_passes`). When false, one pass over the table.
    pub cascade: bool,
    pub max_passes: u32,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to a secret value.
    /// Returns None if the variable is missing or empty.
    pub fn resolve_secret(env_name: &str) -> Option<SecretString> {
        match std::env::var(env_name) {
            Ok(v) if !v.trim().is_empty() => Some(SecretString::new(v)),
            _ => None,
        }
    }
}
