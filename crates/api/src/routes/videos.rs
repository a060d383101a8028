use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Mounted at `/videos`. All routes require auth. Records are immutable,
/// so there is no update.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route("/{id}", get(videos::get_video).delete(videos::delete_video))
}
