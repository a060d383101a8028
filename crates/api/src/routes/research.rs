use axum::routing::post;
use axum::Router;

use crate::handlers::research;
use crate::state::AppState;

/// Merged at the `/api` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scrape", post(research::scrape))
        .route("/youtube/transcript", post(research::youtube_transcript))
}
