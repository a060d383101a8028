use axum::routing::get;
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

/// Mounted at `/scripts`. All routes require auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scripts::list_scripts).post(scripts::create_script))
        .route(
            "/{id}",
            get(scripts::get_script)
                .put(scripts::update_script)
                .delete(scripts::delete_script),
        )
}
