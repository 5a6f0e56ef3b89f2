use pdfjson::errors::ExtractError;
use pdfjson::pipeline::TextExtractor;
use pdfjson::providers::ai::AiProvider;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, String)>>>,
    default_response: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the user prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), response.to_string()));
    }

    /// Sets the response returned when no keyed response matches.
    pub fn set_default_response(&self, response: &str) {
        *self.default_response.lock().unwrap() = Some(response.to_string());
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ExtractError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        if let Some((_, response)) = responses.iter().find(|(key, _)| user_prompt.contains(key)) {
            return Ok(response.clone());
        }

        self.default_response.lock().unwrap().clone().ok_or_else(|| {
            ExtractError::AiApi(format!(
                "MockAiProvider: No response programmed for user prompt. Got: '{user_prompt}'"
            ))
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

// --- Mock Text Extractor ---

/// Treats the uploaded bytes as UTF-8 text, skipping real PDF parsing.
///
/// Data beginning with the configured failure marker yields a
/// `TextExtraction` error.
#[derive(Clone, Debug, Default)]
pub struct MockTextExtractor {
    failure_marker: Option<Vec<u8>>,
}

impl MockTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            failure_marker: Some(marker.as_bytes().to_vec()),
        }
    }
}

#[async_trait]
impl TextExtractor for MockTextExtractor {
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError> {
        if let Some(marker) = &self.failure_marker {
            if data.starts_with(marker) {
                return Err(ExtractError::TextExtraction(
                    "MockTextExtractor: unreadable document".to_string(),
                ));
            }
        }
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod helpers {
    use anyhow::Result;
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    /// Generates a PDF with one page per entry, each page showing its text in Helvetica.
    ///
    /// An empty string produces a page without any text operators.
    pub fn generate_test_pdf(pages: &[&str]) -> Result<Vec<u8>> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let font_name = Name(b"F1");

        let page_ids: Vec<Ref> = (0..pages.len())
            .map(|i| Ref::new(4 + 2 * i as i32))
            .collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(pages.len() as i32);
        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        for (page_id, text) in page_ids.iter().zip(pages) {
            let content_id = Ref::new(page_id.get() + 1);

            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources().fonts().pair(font_name, font_id);
            page.finish();

            let mut content = Content::new();
            if !text.is_empty() {
                content.begin_text();
                content.set_font(font_name, 14.0);
                content.next_line(72.0, 770.0);
                content.show(Str(text.as_bytes()));
                content.end_text();
            }
            pdf.stream(content_id, &content.finish());
        }

        Ok(pdf.finish())
    }
}
