//! Handlers for saved AI voice presets.
//!
//! A preset's `provider` must be one of the text-to-speech providers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::registry::{self, Capability};
use mediaforge_core::types::DbId;
use mediaforge_db::models::ai_voice::{CreateAiVoice, UpdateAiVoice};
use mediaforge_db::repositories::AiVoiceRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VoiceListParams {
    pub provider: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "AiVoice",
        id,
    })
}

fn validate_provider(provider: &str) -> AppResult<()> {
    if registry::find_provider(Capability::TextToSpeech, provider).is_none() {
        return Err(CoreError::unsupported(
            "provider",
            provider,
            registry::provider_keys(Capability::TextToSpeech),
        )
        .into());
    }
    Ok(())
}

fn validate_settings(settings: Option<&serde_json::Value>) -> AppResult<()> {
    match settings {
        Some(s) if !s.is_object() => {
            Err(CoreError::Validation("'settings' must be a JSON object".into()).into())
        }
        _ => Ok(()),
    }
}

pub async fn list_voices(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<VoiceListParams>,
) -> AppResult<impl IntoResponse> {
    let items =
        AiVoiceRepo::list_for_user(&state.pool, auth.user_id, params.provider.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}

pub async fn create_voice(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateAiVoice>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() || input.voice_id.trim().is_empty() {
        return Err(CoreError::Validation("'name' and 'voiceId' are required".into()).into());
    }
    validate_provider(&input.provider)?;
    validate_settings(input.settings.as_ref())?;

    let created = AiVoiceRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = %created.id, provider = %created.provider, "AI voice created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

pub async fn get_voice(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let voice = AiVoiceRepo::find_for_user(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: voice }))
}

pub async fn update_voice(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateAiVoice>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref provider) = input.provider {
        validate_provider(provider)?;
    }
    validate_settings(input.settings.as_ref())?;

    let updated = AiVoiceRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}

pub async fn delete_voice(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AiVoiceRepo::delete(&state.pool, auth.user_id, id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
