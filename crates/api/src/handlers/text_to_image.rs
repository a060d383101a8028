//! Text-to-image provider sub-routes.

use axum::extract::State;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::media::extract_media_url;
use mediaforge_core::registry::Capability;
use mediaforge_providers::openai::{ImageOutput, DEFAULT_IMAGE_SIZE, SUPPORTED_SIZES};
use mediaforge_storage::persist::ArtifactSpec;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handlers::generation::{persist_hosted, provider_entry, require_text, ImageGenerated};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToImageRequest {
    pub prompt: Option<String>,
    pub model: Option<String>,
    /// `WIDTHxHEIGHT`, e.g. `1024x1024`.
    pub size: Option<String>,
}

/// Parse `WIDTHxHEIGHT` into FAL's `image_size` object.
fn fal_image_size(size: &str) -> AppResult<Value> {
    let parsed = size
        .split_once('x')
        .and_then(|(w, h)| Some((w.trim().parse::<u32>().ok()?, h.trim().parse::<u32>().ok()?)))
        .filter(|(w, h)| *w > 0 && *h > 0);
    match parsed {
        Some((width, height)) => Ok(json!({ "width": width, "height": height })),
        None => Err(CoreError::Validation(format!(
            "size must look like WIDTHxHEIGHT (got '{size}')"
        ))
        .into()),
    }
}

// ---------------------------------------------------------------------------
// POST /api/text-to-image/providers/openai
// ---------------------------------------------------------------------------

pub async fn openai(
    State(state): State<AppState>,
    AppJson(req): AppJson<TextToImageRequest>,
) -> AppResult<Json<ImageGenerated>> {
    let entry = provider_entry(Capability::TextToImage, "openai")?;
    let model = entry.resolve_model(req.model.as_deref())?;
    let prompt = require_text("prompt", req.prompt.as_deref())?;
    let size = req.size.as_deref().unwrap_or(DEFAULT_IMAGE_SIZE);
    if !SUPPORTED_SIZES.contains(&size) {
        return Err(CoreError::unsupported("size", size, SUPPORTED_SIZES.iter()).into());
    }

    let output = state.providers.openai.generate_image(model, prompt, size).await?;
    let persisted = match output {
        ImageOutput::Url(url) => {
            persist_hosted(&state, Capability::TextToImage, "openai", model, &url, "png").await
        }
        ImageOutput::Base64(payload) => {
            let spec = ArtifactSpec {
                folder: Capability::TextToImage.storage_folder(),
                provider: "openai",
                model,
                extension: "png",
            };
            state.persister.persist_base64(&payload, Some("image/png"), spec).await
        }
    };

    tracing::info!(model, persisted = persisted.is_durable(), "Image generated");
    Ok(Json(ImageGenerated::new("openai", model, persisted)))
}

// ---------------------------------------------------------------------------
// POST /api/text-to-image/providers/fal
// ---------------------------------------------------------------------------

pub async fn fal(
    State(state): State<AppState>,
    AppJson(req): AppJson<TextToImageRequest>,
) -> AppResult<Json<ImageGenerated>> {
    let entry = provider_entry(Capability::TextToImage, "fal")?;
    let model = entry.resolve_model(req.model.as_deref())?;
    let prompt = require_text("prompt", req.prompt.as_deref())?;

    let mut input = json!({ "prompt": prompt, "num_images": 1 });
    if let Some(size) = req.size.as_deref() {
        input["image_size"] = fal_image_size(size)?;
    }

    let payload = state.providers.fal.run(model, &input).await?;
    let url = extract_media_url(&payload)
        .ok_or_else(|| AppError::generation("Provider returned no media URL", &payload))?;

    let persisted = persist_hosted(&state, Capability::TextToImage, "fal", model, &url, "png").await;
    tracing::info!(model, persisted = persisted.is_durable(), "Image generated");
    Ok(Json(ImageGenerated::new("fal", model, persisted)))
}
