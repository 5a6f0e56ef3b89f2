//! # Extraction Handlers
//!
//! `POST /extract` backs the form on the upload page and answers with the
//! re-rendered page. `POST /api/extract` runs the same pipeline and answers
//! with JSON.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::{
    errors::NO_FILES_NOTICE,
    page::{render_page, ResultsView},
    types::ExtractResponse,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use axum_extra::extract::Multipart;
use pdfjson::UploadedFile;
use serde_json::json;
use tracing::{info, warn};

/// Multipart field names that carry uploaded PDFs.
const FILE_FIELDS: [&str; 2] = ["files", "file"];

fn is_pdf_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
}

/// Reads every uploaded PDF from the multipart body, in upload order.
///
/// Empty parts are skipped: a browser submits one with an empty file name
/// when the form is sent without a selection.
pub async fn collect_uploads(mut multipart: Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            warn!("Ignoring unknown multipart field: {}", name);
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await?;
        if data.is_empty() {
            continue;
        }
        if !is_pdf_name(&file_name) {
            return Err(AppError::BadRequest(format!(
                "Only PDF files are accepted, got '{file_name}'."
            )));
        }

        info!("Received upload: {} ({} bytes)", file_name, data.len());
        uploads.push(UploadedFile::new(file_name, data.to_vec()));
    }

    Ok(uploads)
}

fn page_response(status: StatusCode, view: ResultsView<'_>) -> Response {
    match render_page(view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

fn error_page(error: AppError) -> Response {
    let (status, message) = error.status_and_message();
    page_response(status, ResultsView::Error(&message))
}

/// The handler for the form submission (`POST /extract`).
///
/// Renders the page again with either the extracted invoices, the
/// "no files" notice or the error that stopped the batch.
pub async fn extract_page_handler(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let uploads = match collect_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(e) => return error_page(e),
    };

    if uploads.is_empty() {
        info!("Extraction requested without any uploads.");
        return page_response(StatusCode::OK, ResultsView::Notice(NO_FILES_NOTICE));
    }

    match app_state.pipeline().create_docs(&uploads).await {
        Ok(documents) => page_response(StatusCode::OK, ResultsView::Documents(&documents)),
        Err(e) => error_page(e.into()),
    }
}

/// The handler for the JSON endpoint (`POST /api/extract`).
pub async fn extract_api_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ExtractResponse>>, AppError> {
    let uploads = collect_uploads(multipart).await?;
    if uploads.is_empty() {
        return Err(AppError::NoFiles);
    }

    let documents = app_state.pipeline().create_docs(&uploads).await?;

    let debug_info = json!({
        "model": app_state.ai_provider.model_name(),
        "files": uploads
            .iter()
            .map(|u| json!({ "file_name": u.file_name, "size": u.data.len() }))
            .collect::<Vec<_>>(),
    });

    Ok(wrap_response(
        ExtractResponse { documents },
        debug_params,
        Some(debug_info),
    ))
}
