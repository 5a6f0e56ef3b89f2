//! # Application Configuration
//!
//! This module defines the configuration structure for the `pdfjson-server` and
//! provides the logic for loading it from an optional `config.yml` file and
//! environment variables.

use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use pdfjson::prompts::{validate_prompt_template, INVOICE_EXTRACTION_PROMPT};
use pdfjson::providers::ai::gemini::DEFAULT_GEMINI_MODEL;
use pdfjson::providers::factory::ProviderConfig;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

/// Environment variables consulted, in order, when no credential is configured.
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "AI_API_KEY"];

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
    /// Indicates a configuration that loaded but cannot be used.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The maximum size of one upload request, in MiB.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
    /// The hosted model used for extraction.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Overrides the built-in invoice instruction. Must contain `{pages_data}`.
    #[serde(default)]
    pub prompt_template: Option<String>,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    9090
}

fn default_max_upload_mb() -> usize {
    25
}

impl AppConfig {
    /// The instruction template in effect.
    pub fn prompt_template(&self) -> &str {
        self.prompt_template
            .as_deref()
            .unwrap_or(INVOICE_EXTRACTION_PROMPT)
    }

    /// Checks everything the server needs before it starts accepting uploads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.provider.provider.as_str() {
            "gemini" => {
                if self.provider.api_key.is_none() {
                    return Err(ConfigError::Invalid(format!(
                        "no API key for the gemini provider. Set {} in your environment or .env file.",
                        CREDENTIAL_ENV_VARS[0]
                    )));
                }
            }
            "local" => {
                if self.provider.api_url.is_none() {
                    return Err(ConfigError::Invalid(
                        "provider.api_url is required for the local provider.".to_string(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported AI provider type '{other}'. Use 'gemini' or 'local'."
                )));
            }
        }

        validate_prompt_template(self.prompt_template())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.max_upload_mb == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_mb must be greater than zero.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Constructs a `config::Value` table with the default provider settings.
/// This serves as the base layer of configuration.
fn build_default_provider() -> HashMap<String, ConfigValue> {
    [("provider", "gemini"), ("model_name", DEFAULT_GEMINI_MODEL)]
        .into_iter()
        .map(|(key, value)| {
            (
                key.to_string(),
                ConfigValue::new(None, ConfigValueKind::String(value.to_string())),
            )
        })
        .collect()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Looks up the credential in the process environment.
fn credential_from_env() -> Option<String> {
    CREDENTIAL_ENV_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Loads the application configuration from a file and environment variables.
///
/// - Layer 1: built-in defaults (gemini, `gemini-1.5-flash`).
/// - Layer 2: `config.yml` next to this crate, or the given override path, with
///   `${VAR}` substitution. Optional unless an override path is given.
/// - Layer 3: `prompt.yml` next to this crate, for prompt overrides.
/// - Layer 4: plain environment variables for top-level keys like `PORT`.
/// - Layer 5: `PDFJSON_`-prefixed variables for nested keys
///   (e.g. `PDFJSON_PROVIDER__MODEL_NAME`).
///
/// The credential falls back to `GOOGLE_API_KEY`, then `AI_API_KEY`. The
/// result is validated before it is returned.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("provider", build_default_provider())?;

    // Layer 2: Main config file.
    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    // Layer 3: User Prompt Overrides (Optional)
    let user_prompt_path = format!("{base_path}/prompt.yml");
    if let Some(user_prompts_content) = read_and_substitute(&user_prompt_path)? {
        info!("Loading user prompt overrides from '{user_prompt_path}'.");
        builder = builder.add_source(File::from_str(&user_prompts_content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 4: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 5: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("PDFJSON")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Substitution leaves empty strings behind for unset variables.
    config.provider.api_key = config
        .provider
        .api_key
        .take()
        .filter(|key| !key.trim().is_empty())
        .or_else(credential_from_env);

    config.validate()?;
    Ok(config)
}
