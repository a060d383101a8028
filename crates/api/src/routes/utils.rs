use axum::routing::post;
use axum::Router;

use crate::handlers::utils;
use crate::state::AppState;

/// Mounted at `/utils`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parse-docx", post(utils::parse_docx))
        .route("/markdown-to-docx", post(utils::markdown_to_docx))
        .route("/remove-links", post(utils::remove_links))
        .route("/chunk-text", post(utils::chunk_text))
}
