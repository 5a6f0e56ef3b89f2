//! # AI Provider Factory
//!
//! Builds the configured `AiProvider` from a `ProviderConfig`. Placing this in
//! the library lets the server and the tests share one construction path.

use crate::{
    errors::ExtractError,
    providers::ai::{
        gemini::{gemini_api_url, GeminiProvider, DEFAULT_GEMINI_MODEL},
        local::LocalAiProvider,
        AiProvider,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Configuration for the hosted text-generation model.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct ProviderConfig {
    /// The type of provider ("gemini" or "local").
    #[serde(default = "default_provider")]
    pub provider: String,
    /// The API URL. Optional for Gemini, where it is derived from the model name.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The credential. Required for Gemini, optional for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .finish()
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model_name() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: None,
            api_key: None,
            model_name: default_model_name(),
        }
    }
}

/// Creates an AI provider instance from its configuration.
///
/// Fails when a Gemini provider has no credential, when a local provider has
/// no URL, or when the provider type is unknown.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn AiProvider>, ExtractError> {
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    ExtractError::ProviderConfig(
                        "an API key is required for the gemini provider. Set GOOGLE_API_KEY in your environment or .env file."
                            .to_string(),
                    )
                })?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| gemini_api_url(&config.model_name));
            info!(url = %api_url, model = %config.model_name, "Configuring Gemini provider");
            Box::new(GeminiProvider::new(
                api_url,
                api_key,
                config.model_name.clone(),
            )?)
        }
        "local" => {
            let api_url = config.api_url.clone().ok_or_else(|| {
                ExtractError::ProviderConfig(
                    "api_url is required for the local provider.".to_string(),
                )
            })?;
            info!(url = %api_url, model = %config.model_name, "Configuring local AI provider");
            Box::new(LocalAiProvider::new(
                api_url,
                config.api_key.clone(),
                Some(config.model_name.clone()),
            )?)
        }
        other => {
            return Err(ExtractError::ProviderConfig(format!(
                "unsupported AI provider type '{other}'"
            )));
        }
    };

    Ok(provider)
}
