//! Source material for scripts: scraped web pages and YouTube transcripts.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::links::remove_links;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: Option<String>,
}

fn require_http_url(url: Option<&str>) -> AppResult<&str> {
    match url.map(str::trim) {
        Some(u) if u.starts_with("http://") || u.starts_with("https://") => Ok(u),
        _ => Err(CoreError::Validation("'url' must be an http(s) URL".into()).into()),
    }
}

// ---------------------------------------------------------------------------
// POST /scrape
// ---------------------------------------------------------------------------

/// Scrape a page to markdown with every link removed.
pub async fn scrape(
    State(state): State<AppState>,
    AppJson(req): AppJson<UrlRequest>,
) -> AppResult<impl IntoResponse> {
    let url = require_http_url(req.url.as_deref())?;
    let mut page = state.providers.firecrawl.scrape(url).await?;
    page.markdown = remove_links(&page.markdown);
    tracing::info!(url, chars = page.markdown.len(), "Page scraped");
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// POST /youtube/transcript
// ---------------------------------------------------------------------------

pub async fn youtube_transcript(
    State(state): State<AppState>,
    AppJson(req): AppJson<UrlRequest>,
) -> AppResult<impl IntoResponse> {
    let url = require_http_url(req.url.as_deref())?;
    let transcript = state.providers.supadata.youtube_transcript(url).await?;
    tracing::info!(url, chars = transcript.content.len(), "Transcript fetched");
    Ok(Json(DataResponse { data: transcript }))
}
