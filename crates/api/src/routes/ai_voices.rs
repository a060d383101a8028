use axum::routing::get;
use axum::Router;

use crate::handlers::ai_voices;
use crate::state::AppState;

/// Mounted at `/ai-voices`. All routes require auth.
///
/// ```text
/// GET    /        -> list_voices (?provider=)
/// POST   /        -> create_voice
/// GET    /{id}    -> get_voice
/// PUT    /{id}    -> update_voice
/// DELETE /{id}    -> delete_voice
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ai_voices::list_voices).post(ai_voices::create_voice))
        .route(
            "/{id}",
            get(ai_voices::get_voice)
                .put(ai_voices::update_voice)
                .delete(ai_voices::delete_voice),
        )
}
