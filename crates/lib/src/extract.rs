//! # Invoice JSON Extraction Call
//!
//! Formats the instruction template with a document's text, sends it to the
//! model and parses the completion as JSON.
//!
//! The completion is parsed exactly as returned. A model that wraps its answer
//! in markdown fences or prepends prose produces a `JsonParse` error; there is
//! no sanitization and no retry.

use crate::{
    errors::ExtractError,
    prompts::format_invoice_prompt,
    providers::ai::AiProvider,
};
use serde_json::Value;
use tracing::{debug, instrument};

/// Parses a model completion as JSON.
///
/// The result is schema-less: any JSON value the model produced is accepted.
pub fn parse_completion(completion: &str) -> Result<Value, ExtractError> {
    Ok(serde_json::from_str(completion)?)
}

/// Runs the extraction call for one document's text.
#[instrument(skip_all, fields(text_len = pages_data.len()))]
pub async fn extract_invoice_json(
    ai_provider: &dyn AiProvider,
    prompt_template: &str,
    pages_data: &str,
) -> Result<Value, ExtractError> {
    let prompt = format_invoice_prompt(prompt_template, pages_data);
    let completion = ai_provider.generate("", &prompt).await?;
    debug!(completion_len = completion.len(), "Received completion");
    parse_completion(&completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_object() {
        let value = parse_completion(r#"{"customer": {"name": "ACME"}, "total": "10.00"}"#).unwrap();
        assert_eq!(value["customer"]["name"], "ACME");
    }

    #[test]
    fn test_parse_accepts_surrounding_whitespace() {
        assert!(parse_completion("\n  {\"total\": \"1\"}\n").is_ok());
    }

    #[test]
    fn test_fenced_completion_is_rejected() {
        let fenced = "```json\n{\"total\": \"1\"}\n```";
        assert!(matches!(
            parse_completion(fenced),
            Err(ExtractError::JsonParse(_))
        ));
    }

    #[test]
    fn test_prose_prefix_is_rejected() {
        let answer = "Here is the JSON you asked for: {\"total\": \"1\"}";
        assert!(matches!(
            parse_completion(answer),
            Err(ExtractError::JsonParse(_))
        ));
    }

    #[test]
    fn test_empty_completion_is_rejected() {
        assert!(parse_completion("").is_err());
    }
}
