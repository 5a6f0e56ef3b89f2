//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The state is immutable after startup: uploads
//! and results are scoped to the request that carries them.

use crate::config::AppConfig;
use pdfjson::{
    pipeline::TextExtractor,
    providers::{ai::AiProvider, factory::create_provider},
    ExtractionPipeline,
};
use pdfjson_pdf::PdfTextExtractor;
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The hosted model client.
    pub ai_provider: Arc<dyn AiProvider>,
    /// Turns uploaded bytes into text.
    pub text_extractor: Arc<dyn TextExtractor>,
    /// The instruction template in effect.
    pub prompt_template: Arc<str>,
}

impl AppState {
    /// Assembles the state from already-built parts.
    pub fn new(
        config: AppConfig,
        ai_provider: Arc<dyn AiProvider>,
        text_extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let prompt_template = Arc::from(config.prompt_template());
        Self {
            config: Arc::new(config),
            ai_provider,
            text_extractor,
            prompt_template,
        }
    }

    /// A pipeline borrowing this state's components.
    pub fn pipeline(&self) -> ExtractionPipeline<'_> {
        ExtractionPipeline::new(
            self.text_extractor.as_ref(),
            self.ai_provider.as_ref(),
            &self.prompt_template,
        )
    }
}

/// Builds the shared application state from the configuration.
///
/// This instantiates the configured AI provider client and the PDF text
/// extractor.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider: Arc<dyn AiProvider> = Arc::from(create_provider(&config.provider)?);
    info!(
        provider = %config.provider.provider,
        model = %ai_provider.model_name(),
        "Initialized AI provider."
    );

    Ok(AppState::new(
        config,
        ai_provider,
        Arc::new(PdfTextExtractor::new()),
    ))
}
