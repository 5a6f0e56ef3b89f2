//! # General Route Handlers
//!
//! The upload page and the health check.

use crate::page::{render_page, ResultsView};
use axum::response::Html;

use super::AppError;

/// The handler for the root (`/`) endpoint: the empty upload page.
///
/// Loading it again is how the "Clear Files" action discards prior results.
pub async fn root() -> Result<Html<String>, AppError> {
    Ok(Html(render_page(ResultsView::Empty)?))
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
