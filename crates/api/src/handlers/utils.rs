//! Text and document utilities: DOCX import/export, link removal, chunking.

use axum::extract::Multipart;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use mediaforge_core::chunking::{chunk_text as split_chunks, validate_chunk_size, DEFAULT_CHUNK_CHARS};
use mediaforge_core::links::remove_links as strip_links;
use mediaforge_core::markdown::parse_markdown;
use serde::{Deserialize, Serialize};

use crate::docx::{self, DOCX_CONTENT_TYPE};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct TextBody {
    pub text: String,
}

// ---------------------------------------------------------------------------
// POST /utils/parse-docx
// ---------------------------------------------------------------------------

/// Extract plain text from an uploaded DOCX (multipart field `file`).
pub async fn parse_docx(mut multipart: Multipart) -> AppResult<impl IntoResponse> {
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            file = Some(bytes.to_vec());
            break;
        }
    }

    let bytes = file.ok_or_else(|| AppError::BadRequest("Missing multipart field 'file'".into()))?;
    let text = docx::extract_text(&bytes).map_err(|e| AppError::BadRequest(e.to_string()))?;
    tracing::debug!(chars = text.chars().count(), "Parsed DOCX upload");
    Ok(Json(DataResponse { data: TextBody { text } }))
}

// ---------------------------------------------------------------------------
// POST /utils/markdown-to-docx
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MarkdownToDocxRequest {
    pub markdown: String,
    /// Download name without extension (default: `document`).
    pub filename: Option<String>,
}

/// Keep a download name to characters safe inside a header value.
fn safe_filename(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or("document")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' ' | '.'))
        .collect();
    let cleaned = cleaned.trim().trim_end_matches(".docx").trim();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Render markdown as a DOCX download.
pub async fn markdown_to_docx(
    AppJson(req): AppJson<MarkdownToDocxRequest>,
) -> AppResult<impl IntoResponse> {
    let paragraphs = parse_markdown(&req.markdown);
    let bytes = docx::render_markdown(&paragraphs)
        .map_err(|e| AppError::InternalError(format!("DOCX rendering failed: {e}")))?;

    let disposition = format!(
        "attachment; filename=\"{}.docx\"",
        safe_filename(req.filename.as_deref())
    );
    Ok((
        [
            (CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

// ---------------------------------------------------------------------------
// POST /utils/remove-links
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RemoveLinksRequest {
    pub text: String,
}

pub async fn remove_links(
    AppJson(req): AppJson<RemoveLinksRequest>,
) -> Json<DataResponse<TextBody>> {
    Json(DataResponse {
        data: TextBody {
            text: strip_links(&req.text),
        },
    })
}

// ---------------------------------------------------------------------------
// POST /utils/chunk-text
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkTextRequest {
    pub text: String,
    pub max_chars: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChunksBody {
    pub chunks: Vec<String>,
}

pub async fn chunk_text(
    AppJson(req): AppJson<ChunkTextRequest>,
) -> AppResult<impl IntoResponse> {
    let max_chars = req.max_chars.unwrap_or(DEFAULT_CHUNK_CHARS);
    validate_chunk_size(max_chars)?;
    let chunks = split_chunks(&req.text, max_chars);
    Ok(Json(DataResponse {
        data: ChunksBody { chunks },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(safe_filename(None), "document");
        assert_eq!(safe_filename(Some("My Script.docx")), "My Script");
        assert_eq!(safe_filename(Some("a\"b\r\nc")), "abc");
        assert_eq!(safe_filename(Some("\"\"")), "document");
    }
}
