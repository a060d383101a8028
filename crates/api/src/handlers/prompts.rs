//! Handlers for saved prompts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::types::DbId;
use mediaforge_db::models::prompt::{CreatePrompt, UpdatePrompt};
use mediaforge_db::repositories::PromptRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /prompts`.
#[derive(Debug, Deserialize)]
pub struct PromptListParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Prompt",
        id,
    })
}

fn validate_non_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("'{field}' must not be empty")).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /prompts
// ---------------------------------------------------------------------------

pub async fn list_prompts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PromptListParams>,
) -> AppResult<impl IntoResponse> {
    let items = PromptRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.category.as_deref(),
        mediaforge_db::clamp_limit(params.limit),
        mediaforge_db::clamp_offset(params.offset),
    )
    .await?;
    tracing::debug!(count = items.len(), "Listed prompts");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /prompts
// ---------------------------------------------------------------------------

pub async fn create_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePrompt>,
) -> AppResult<impl IntoResponse> {
    validate_non_blank("name", &input.name)?;
    validate_non_blank("content", &input.content)?;

    let created = PromptRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = %created.id, name = %created.name, "Prompt created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /prompts/{id}
// ---------------------------------------------------------------------------

pub async fn get_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = PromptRepo::find_for_user(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: prompt }))
}

// ---------------------------------------------------------------------------
// PUT /prompts/{id}
// ---------------------------------------------------------------------------

pub async fn update_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdatePrompt>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        validate_non_blank("name", name)?;
    }
    if let Some(ref content) = input.content {
        validate_non_blank("content", content)?;
    }

    let updated = PromptRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id = %id, "Prompt updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /prompts/{id}
// ---------------------------------------------------------------------------

pub async fn delete_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !PromptRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id = %id, "Prompt deleted");
    Ok(StatusCode::NO_CONTENT)
}
