//! Image-to-video provider sub-routes.

use axum::extract::State;
use axum::Json;
use mediaforge_core::registry::Capability;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::generation::{
    generate_video, normalize_image, provider_entry, require_text, set_opt, validate_duration,
    VideoGenerated, SUPPORTED_DURATIONS,
};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageToVideoRequest {
    pub prompt: Option<String>,
    /// URL, data URI, or bare base64.
    pub image: Option<String>,
    pub model: Option<String>,
    pub duration: Option<u32>,
}

/// Replicate input field holding the start frame for `model`.
fn replicate_image_field(model: &str) -> &'static str {
    if model.starts_with("kwaivgi/kling") {
        "start_image"
    } else {
        "image"
    }
}

// ---------------------------------------------------------------------------
// POST /api/image-to-video/providers/fal
// ---------------------------------------------------------------------------

pub async fn fal(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    AppJson(req): AppJson<ImageToVideoRequest>,
) -> AppResult<Json<VideoGenerated>> {
    let entry = provider_entry(Capability::ImageToVideo, "fal")?;
    let model = entry.resolve_model(req.model.as_deref())?;
    let prompt = require_text("prompt", req.prompt.as_deref())?;
    let image = require_text("image", req.image.as_deref())?;
    let duration = validate_duration(req.duration)?;

    let mut input = json!({ "prompt": prompt, "image_url": normalize_image(image) });
    set_opt(&mut input, "duration", duration.map(|d| d.to_string()));

    let backend = state.providers.fal.queue(model);
    let owner = auth.map(|a| a.user_id);
    generate_video(&state, owner, &backend, Capability::ImageToVideo, "fal", model, &input).await
}

// ---------------------------------------------------------------------------
// POST /api/image-to-video/providers/replicate
// ---------------------------------------------------------------------------

pub async fn replicate(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    AppJson(req): AppJson<ImageToVideoRequest>,
) -> AppResult<Json<VideoGenerated>> {
    let entry = provider_entry(Capability::ImageToVideo, "replicate")?;
    let model = entry.resolve_model(req.model.as_deref())?;
    let prompt = require_text("prompt", req.prompt.as_deref())?;
    let image = require_text("image", req.image.as_deref())?;
    let duration = validate_duration(req.duration)?.unwrap_or(SUPPORTED_DURATIONS[0]);

    let mut input = json!({ "prompt": prompt, "duration": duration });
    input[replicate_image_field(model)] = normalize_image(image).into();

    let backend = state.providers.replicate.predictions(model);
    let owner = auth.map(|a| a.user_id);
    generate_video(&state, owner, &backend, Capability::ImageToVideo, "replicate", model, &input).await
}
