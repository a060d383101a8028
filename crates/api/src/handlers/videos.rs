//! Handlers for generated video records.
//!
//! Records are immutable. Client-created records never own a stored object;
//! only records written by an authenticated generation carry a storage key.
//! Deleting such a record also removes its object, and a storage failure
//! there is logged and does not fail the request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::types::DbId;
use mediaforge_db::models::video::CreateVideo;
use mediaforge_db::repositories::VideoRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Video", id })
}

pub async fn list_videos(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let items = VideoRepo::list_for_user(
        &state.pool,
        auth.user_id,
        mediaforge_db::clamp_limit(params.limit),
        mediaforge_db::clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

pub async fn create_video(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateVideo>,
) -> AppResult<impl IntoResponse> {
    for (field, value) in [
        ("provider", &input.provider),
        ("model", &input.model),
        ("publicUrl", &input.public_url),
    ] {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!("'{field}' is required")).into());
        }
    }
    if input.size_bytes.is_some_and(|s| s < 0) {
        return Err(CoreError::Validation("'sizeBytes' must not be negative".into()).into());
    }

    let created = VideoRepo::create(&state.pool, auth.user_id, &input, None).await?;
    tracing::info!(id = %created.id, provider = %created.provider, "Video recorded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

pub async fn get_video(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = VideoRepo::find_for_user(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: video }))
}

pub async fn delete_video(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let video = VideoRepo::delete(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let (Some(key), Some(store)) = (video.storage_key.as_deref(), state.persister.store()) {
        if let Err(e) = store.delete(key).await {
            tracing::warn!(id = %id, key, error = %e, "Failed to delete stored video object");
        }
    }

    tracing::info!(id = %id, "Video deleted");
    Ok(StatusCode::NO_CONTENT)
}
