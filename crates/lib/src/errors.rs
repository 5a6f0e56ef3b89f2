use thiserror::Error;

/// Custom error types for the extraction pipeline.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider is not configured correctly: {0}")]
    ProviderConfig(String),
    #[error("Failed to extract text from document: {0}")]
    TextExtraction(String),
    #[error("Failed to parse model completion as JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("Failed to serialize extracted data: {0}")]
    Serialization(String),
    #[error("Invalid prompt template: {0}")]
    InvalidPromptTemplate(String),
    #[error("Extraction of document {index} ('{source_name}') failed: {error}")]
    Document {
        index: usize,
        source_name: String,
        error: Box<ExtractError>,
    },
}

impl ExtractError {
    /// Returns the innermost error, looking through `Document` wrappers.
    pub fn root_cause(&self) -> &ExtractError {
        match self {
            ExtractError::Document { error, .. } => error.root_cause(),
            other => other,
        }
    }
}
