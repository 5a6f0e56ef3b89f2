use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use pdfjson::ExtractError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the extraction pipeline.
    Extract(ExtractError),
    /// The request did not carry a single non-empty file.
    NoFiles,
    /// The request was malformed or carried an unsupported file.
    BadRequest(String),
    /// The multipart body could not be read; carries the status the reader reported.
    Multipart { status: StatusCode, message: String },
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// The notice shown when the extraction action is triggered without uploads.
pub const NO_FILES_NOTICE: &str = "Please upload some PDFs first!";

/// Conversion from `ExtractError` to `AppError`.
impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::Extract(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "The upload exceeds the configured size limit.".to_string()
        } else {
            format!("Invalid multipart upload: {}", err.body_text())
        };
        AppError::Multipart { status, message }
    }
}

impl AppError {
    /// Maps the error to a status code and a message safe to show the user.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Extract(err) => {
                // Log the original error for debugging purposes
                error!("ExtractError: {:?}", err);
                let prefix = match err {
                    ExtractError::Document {
                        index, source_name, ..
                    } => format!("Invoice {index} ('{source_name}'): "),
                    _ => String::new(),
                };
                let (status, message) = match err.root_cause() {
                    ExtractError::AiRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI provider failed: {e}"),
                    ),
                    ExtractError::AiDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize AI provider response: {e}"),
                    ),
                    ExtractError::AiApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("AI provider error: {e}"))
                    }
                    ExtractError::JsonParse(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("The model did not return valid JSON: {e}"),
                    ),
                    ExtractError::TextExtraction(e) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        format!("Could not read the PDF: {e}"),
                    ),
                    ExtractError::Serialization(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to render the extracted data.".to_string(),
                    ),
                    ExtractError::ReqwestClientBuild(_)
                    | ExtractError::ProviderConfig(_)
                    | ExtractError::InvalidPromptTemplate(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                    ExtractError::Document { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal server error occurred.".to_string(),
                    ),
                };
                (status, format!("{prefix}{message}"))
            }
            AppError::NoFiles => (StatusCode::BAD_REQUEST, NO_FILES_NOTICE.to_string()),
            AppError::BadRequest(message) => {
                warn!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, message.clone())
            }
            AppError::Multipart { status, message } => {
                warn!(%status, "Rejected multipart upload: {}", message);
                (*status, message.clone())
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
