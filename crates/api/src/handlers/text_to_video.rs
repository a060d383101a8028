//! Text-to-video provider sub-routes.

use axum::extract::State;
use axum::Json;
use mediaforge_core::registry::Capability;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::generation::{
    generate_video, provider_entry, require_text, set_opt, validate_duration, VideoGenerated,
};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToVideoRequest {
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub duration: Option<u32>,
    pub aspect_ratio: Option<String>,
    pub negative_prompt: Option<String>,
}

/// Provider input shared by both providers. FAL wants the duration as a
/// string, Replicate as a number.
fn build_input(req: &TextToVideoRequest, prompt: &str, duration_as_string: bool) -> AppResult<Value> {
    let duration = validate_duration(req.duration)?;
    let mut input = json!({ "prompt": prompt });
    if duration_as_string {
        set_opt(&mut input, "duration", duration.map(|d| d.to_string()));
    } else {
        set_opt(&mut input, "duration", duration);
    }
    set_opt(&mut input, "aspect_ratio", req.aspect_ratio.clone());
    set_opt(&mut input, "negative_prompt", req.negative_prompt.clone());
    Ok(input)
}

// ---------------------------------------------------------------------------
// POST /api/text-to-video/providers/fal
// ---------------------------------------------------------------------------

pub async fn fal(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    AppJson(req): AppJson<TextToVideoRequest>,
) -> AppResult<Json<VideoGenerated>> {
    let entry = provider_entry(Capability::TextToVideo, "fal")?;
    let model = entry.resolve_model(req.model.as_deref())?;
    let prompt = require_text("prompt", req.prompt.as_deref())?;
    let input = build_input(&req, prompt, true)?;

    let backend = state.providers.fal.queue(model);
    let owner = auth.map(|a| a.user_id);
    generate_video(&state, owner, &backend, Capability::TextToVideo, "fal", model, &input).await
}

// ---------------------------------------------------------------------------
// POST /api/text-to-video/providers/replicate
// ---------------------------------------------------------------------------

pub async fn replicate(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    AppJson(req): AppJson<TextToVideoRequest>,
) -> AppResult<Json<VideoGenerated>> {
    let entry = provider_entry(Capability::TextToVideo, "replicate")?;
    let model = entry.resolve_model(req.model.as_deref())?;
    let prompt = require_text("prompt", req.prompt.as_deref())?;
    let input = build_input(&req, prompt, false)?;

    let backend = state.providers.replicate.predictions(model);
    let owner = auth.map(|a| a.user_id);
    generate_video(&state, owner, &backend, Capability::TextToVideo, "replicate", model, &input).await
}
