//! Handlers for saved scripts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::types::DbId;
use mediaforge_db::models::script::{CreateScript, UpdateScript};
use mediaforge_db::repositories::ScriptRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Script",
        id,
    })
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("'title' must not be empty".into()).into());
    }
    Ok(())
}

pub async fn list_scripts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let items = ScriptRepo::list_for_user(
        &state.pool,
        auth.user_id,
        mediaforge_db::clamp_limit(params.limit),
        mediaforge_db::clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

pub async fn create_script(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateScript>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    let created = ScriptRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = %created.id, "Script created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

pub async fn get_script(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let script = ScriptRepo::find_for_user(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: script }))
}

pub async fn update_script(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateScript>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        validate_title(title)?;
    }
    let updated = ScriptRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}

pub async fn delete_script(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ScriptRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id = %id, "Script deleted");
    Ok(StatusCode::NO_CONTENT)
}
