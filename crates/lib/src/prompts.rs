//! # Invoice Extraction Prompt
//!
//! The fixed instruction sent to the model for every uploaded document. The
//! extracted PDF text is substituted verbatim for the `{pages_data}`
//! placeholder; the formatted prompt travels as a single user turn.

use crate::errors::ExtractError;

/// The placeholder replaced by the extracted document text.
pub const PAGES_DATA_PLACEHOLDER: &str = "{pages_data}";

/// The default instruction asking the model for strict JSON.
///
/// Placeholders: `{pages_data}`
pub const INVOICE_EXTRACTION_PROMPT: &str = r#"
        You are a highly proficient invoice information extractor.

        1. **Scrutinize the provided invoice text and extract ONLY the Customer Details, Products, and Total Amount.** Structure this data into a STRICTLY VALID JSON format.
        2. **Enclose all extracted values within double quotes.** Ensure any nested objects or arrays adhere to proper JSON syntax.
        3. **Transform the Invoice data into JSON format.** Employ appropriate JSON tags corresponding to the data in the text.
        4. **Return the JSON response without starting with ```json and ending with ```.**

        Invoice Data:
        {pages_data}
    "#;

/// Substitutes the extracted text into the template.
///
/// The text is inserted as-is: no escaping, trimming or truncation.
pub fn format_invoice_prompt(template: &str, pages_data: &str) -> String {
    template.replace(PAGES_DATA_PLACEHOLDER, pages_data)
}

/// Checks that a template can carry the document text.
pub fn validate_prompt_template(template: &str) -> Result<(), ExtractError> {
    if template.contains(PAGES_DATA_PLACEHOLDER) {
        Ok(())
    } else {
        Err(ExtractError::InvalidPromptTemplate(format!(
            "the template must contain the '{PAGES_DATA_PLACEHOLDER}' placeholder"
        )))
    }
}
