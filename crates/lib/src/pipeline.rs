//! # Extraction Pipeline
//!
//! Runs the per-file sequence text extraction -> prompt formatting -> model
//! call -> JSON parse over a batch of uploaded files.
//!
//! Files are processed strictly one after another in upload order. The first
//! failure aborts the batch and no partial results are returned.

use crate::{errors::ExtractError, extract::extract_invoice_json, providers::ai::AiProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tracing::{info, instrument, warn};

/// A source of plain text for a document's raw bytes.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts the concatenated text of every page.
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError>;
}

/// One uploaded file, scoped to the request that carried it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }
}

/// The parsed model output for one uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedDocument {
    /// 1-based position of the file in the upload order.
    pub index: usize,
    /// The name of the uploaded file.
    pub source: String,
    /// The name offered for the JSON download.
    pub file_name: String,
    pub data: Value,
}

impl ExtractedDocument {
    pub fn new(index: usize, source: impl Into<String>, data: Value) -> Self {
        Self {
            index,
            source: source.into(),
            file_name: download_file_name(index),
            data,
        }
    }

    /// Renders the data as pretty JSON with a four-space indent.
    pub fn to_download_json(&self) -> Result<String, ExtractError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        self.data
            .serialize(&mut ser)
            .map_err(|e| ExtractError::Serialization(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| ExtractError::Serialization(e.to_string()))
    }
}

/// The download name for the document at `index` (1-based).
pub fn download_file_name(index: usize) -> String {
    format!("extracted_data_{index}.json")
}

/// Wires a text extractor, a model and a prompt template together.
pub struct ExtractionPipeline<'a> {
    text_extractor: &'a dyn TextExtractor,
    ai_provider: &'a dyn AiProvider,
    prompt_template: &'a str,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(
        text_extractor: &'a dyn TextExtractor,
        ai_provider: &'a dyn AiProvider,
        prompt_template: &'a str,
    ) -> Self {
        Self {
            text_extractor,
            ai_provider,
            prompt_template,
        }
    }

    /// Extracts the JSON for a single file.
    ///
    /// Blank text is logged but still sent to the model.
    #[instrument(skip(self, file), fields(file = %file.file_name, size = file.data.len()))]
    pub async fn extract_document(&self, file: &UploadedFile) -> Result<Value, ExtractError> {
        let content_hash = format!("{:x}", md5::compute(&file.data));
        let text = self.text_extractor.extract_text(&file.data).await?;

        if text.trim().is_empty() {
            warn!(%content_hash, "Document yielded no text; sending an empty invoice to the model.");
        } else {
            info!(%content_hash, chars = text.len(), "Extracted document text.");
        }

        extract_invoice_json(self.ai_provider, self.prompt_template, &text).await
    }

    /// Processes every file in order and returns one document per file.
    ///
    /// An empty batch returns an empty list without touching the model.
    pub async fn create_docs(
        &self,
        files: &[UploadedFile],
    ) -> Result<Vec<ExtractedDocument>, ExtractError> {
        info!(
            files = files.len(),
            model = %self.ai_provider.model_name(),
            "Starting extraction batch."
        );

        let mut documents = Vec::with_capacity(files.len());
        for (position, file) in files.iter().enumerate() {
            let index = position + 1;
            let data = self
                .extract_document(file)
                .await
                .map_err(|error| ExtractError::Document {
                    index,
                    source_name: file.file_name.clone(),
                    error: Box::new(error),
                })?;
            documents.push(ExtractedDocument::new(index, file.file_name.clone(), data));
        }

        info!(documents = documents.len(), "Extraction batch complete.");
        Ok(documents)
    }
}
