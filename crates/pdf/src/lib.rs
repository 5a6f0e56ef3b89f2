//! # pdfjson-pdf: PDF Text Extraction Plugin
//!
//! This crate provides text extraction for PDF documents, acting as a plugin
//! for the `pdfjson` pipeline. It implements the `TextExtractor` trait from
//! `pdfjson`.

use async_trait::async_trait;
use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use pdfjson::{ExtractError, TextExtractor};
use thiserror::Error;
use tracing::{info, instrument, warn};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
    #[error("PDF extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<PdfExtractError> for ExtractError {
    fn from(err: PdfExtractError) -> Self {
        ExtractError::TextExtraction(err.to_string())
    }
}

// --- Core Extraction Logic ---

/// Extracts text from all pages of a PDF synchronously.
///
/// Page texts are concatenated in page order. A newline is emitted for every
/// text-line operator and at the end of each text object. A document without
/// text operators yields an empty string.
pub fn extract_text_from_pdf(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
        let Some(content) = &page.contents else {
            warn!("Page {} has no content stream.", page_num);
            continue;
        };
        let operations = content
            .operations(&resolver)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
        for op in operations.iter() {
            match op {
                Op::TextDraw { text } => {
                    full_text.push_str(&text.to_string_lossy());
                }
                Op::TextDrawAdjusted { array } => {
                    for item in array.iter() {
                        if let TextDrawAdjusted::Text(text) = item {
                            full_text.push_str(&text.to_string_lossy());
                        }
                    }
                }
                Op::TextNewline | Op::EndText => full_text.push('\n'),
                _ => {}
            }
        }
    }
    Ok(full_text)
}

/// Runs `extract_text_from_pdf` on the blocking pool.
#[instrument(skip(pdf_data), fields(size = pdf_data.len()))]
pub async fn extract_text_blocking(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let data = pdf_data.to_vec();
    let text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&data)).await??;
    info!(chars = text.len(), "Extracted text from PDF.");
    Ok(text)
}

// --- TextExtractor Implementation ---

/// The `TextExtractor` implementation for PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError> {
        Ok(extract_text_blocking(data).await?)
    }
}
