//! Shared plumbing for the provider sub-routes: input checks, the
//! submit/poll/persist sequence, and the response shapes.

use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::media::extension_from_url;
use mediaforge_core::polling::{self, QueueBackend};
use mediaforge_core::registry::{self, Capability, ProviderEntry};
use mediaforge_core::types::DbId;
use mediaforge_db::models::video::CreateVideo;
use mediaforge_db::repositories::VideoRepo;
use mediaforge_providers::ProviderError;
use mediaforge_storage::persist::{ArtifactSpec, Persisted, StoredArtifact};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Clip lengths in seconds the video providers accept.
pub const SUPPORTED_DURATIONS: [u32; 2] = [5, 10];

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerated {
    pub success: bool,
    pub video_url: String,
    pub provider: &'static str,
    pub model: String,
    pub request_id: String,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    /// Video record written for an authenticated caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerated {
    pub success: bool,
    pub image_url: String,
    pub provider: &'static str,
    pub model: String,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioGenerated {
    pub success: bool,
    pub audio_url: String,
    pub provider: &'static str,
    pub model: String,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

fn storage_key(persisted: &Persisted) -> Option<String> {
    persisted.artifact.as_ref().map(|a| a.key.clone())
}

impl ImageGenerated {
    pub fn new(provider: &'static str, model: &str, persisted: Persisted) -> Self {
        Self {
            success: true,
            storage_key: storage_key(&persisted),
            persisted: persisted.is_durable(),
            image_url: persisted.url,
            provider,
            model: model.to_string(),
        }
    }
}

impl AudioGenerated {
    pub fn new(provider: &'static str, model: &str, persisted: Persisted) -> Self {
        Self {
            success: true,
            storage_key: storage_key(&persisted),
            persisted: persisted.is_durable(),
            audio_url: persisted.url,
            provider,
            model: model.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Input checks
// ---------------------------------------------------------------------------

/// Registry entry for a provider sub-route.
pub fn provider_entry(capability: Capability, key: &str) -> AppResult<&'static ProviderEntry> {
    registry::find_provider(capability, key).ok_or_else(|| {
        AppError::InternalError(format!(
            "provider '{key}' missing from the {} registry",
            capability.slug()
        ))
    })
}

/// A required, non-blank string field.
pub fn require_text<'a>(field: &str, value: Option<&'a str>) -> AppResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("'{field}' is required")).into()),
    }
}

/// Check an optional clip duration against [`SUPPORTED_DURATIONS`].
pub fn validate_duration(duration: Option<u32>) -> AppResult<Option<u32>> {
    match duration {
        Some(d) if !SUPPORTED_DURATIONS.contains(&d) => {
            Err(CoreError::unsupported("duration", d.to_string(), SUPPORTED_DURATIONS).into())
        }
        other => Ok(other),
    }
}

/// Normalize an image given as URL, data URI or bare base64 into something
/// providers accept as an image URL.
pub fn normalize_image(image: &str) -> String {
    let image = image.trim();
    if image.starts_with("http://") || image.starts_with("https://") || image.starts_with("data:")
    {
        return image.to_string();
    }
    let content_type = if image.starts_with("/9j/") {
        "image/jpeg"
    } else if image.starts_with("UklGR") {
        "image/webp"
    } else {
        "image/png"
    };
    mediaforge_core::media::data_uri(content_type, image)
}

/// Insert `value` under `key` when present.
pub fn set_opt<T: Into<Value>>(input: &mut Value, key: &str, value: Option<T>) {
    if let Some(v) = value {
        input[key] = v.into();
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// Submit a video job, poll it to completion and persist the result.
///
/// When `owner` is set and the artifact was persisted, a video record owning
/// the stored object is written for that user.
pub async fn generate_video<B>(
    state: &AppState,
    owner: Option<DbId>,
    backend: &B,
    capability: Capability,
    provider: &'static str,
    model: &str,
    input: &Value,
) -> AppResult<Json<VideoGenerated>>
where
    B: QueueBackend<Error = ProviderError>,
{
    let media = polling::generate(backend, input, state.config.poll).await?;

    let extension = extension_from_url(&media.url).unwrap_or_else(|| "mp4".to_string());
    let persisted = state
        .persister
        .persist_url(
            &media.url,
            ArtifactSpec {
                folder: capability.storage_folder(),
                provider,
                model,
                extension: &extension,
            },
        )
        .await;

    tracing::info!(
        provider,
        model,
        request_id = %media.request_id,
        persisted = persisted.is_durable(),
        "Video generated"
    );

    let video_id = match (owner, persisted.artifact.as_ref()) {
        (Some(user_id), Some(artifact)) => {
            record_video(state, user_id, provider, model, input, artifact).await
        }
        _ => None,
    };

    Ok(Json(VideoGenerated {
        success: true,
        video_id,
        storage_key: storage_key(&persisted),
        persisted: persisted.is_durable(),
        video_url: persisted.url,
        provider,
        model: model.to_string(),
        request_id: media.request_id,
    }))
}

/// Write the video record owning `artifact`. A database failure leaves the
/// object unrecorded and is only logged.
async fn record_video(
    state: &AppState,
    user_id: DbId,
    provider: &str,
    model: &str,
    input: &Value,
    artifact: &StoredArtifact,
) -> Option<DbId> {
    let record = CreateVideo {
        title: None,
        provider: provider.to_string(),
        model: model.to_string(),
        prompt: input["prompt"].as_str().map(str::to_string),
        source_url: artifact.source_url.clone(),
        public_url: artifact.public_url.clone(),
        content_type: Some(artifact.content_type.clone()),
        size_bytes: i64::try_from(artifact.size_bytes).ok(),
    };

    match VideoRepo::create(&state.pool, user_id, &record, Some(&artifact.key)).await {
        Ok(video) => {
            tracing::info!(
                id = %video.id,
                user_id = %user_id,
                key = %artifact.key,
                "Video recorded"
            );
            Some(video.id)
        }
        Err(e) => {
            tracing::warn!(
                user_id = %user_id,
                key = %artifact.key,
                error = %e,
                "Failed to record generated video"
            );
            None
        }
    }
}

/// Persist a hosted media URL for a synchronous provider.
pub async fn persist_hosted(
    state: &AppState,
    capability: Capability,
    provider: &'static str,
    model: &str,
    url: &str,
    default_extension: &str,
) -> Persisted {
    let extension = extension_from_url(url).unwrap_or_else(|| default_extension.to_string());
    state
        .persister
        .persist_url(
            url,
            ArtifactSpec {
                folder: capability.storage_folder(),
                provider,
                model,
                extension: &extension,
            },
        )
        .await
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(require_text("prompt", Some("  a cat ")).unwrap(), "a cat");
        assert_matches!(
            require_text("prompt", Some("   ")),
            Err(AppError::Core(CoreError::Validation(msg))) if msg.contains("'prompt'")
        );
        assert!(require_text("prompt", None).is_err());
    }

    #[test]
    fn duration_must_be_supported() {
        assert_eq!(validate_duration(None).unwrap(), None);
        assert_eq!(validate_duration(Some(10)).unwrap(), Some(10));
        assert_matches!(
            validate_duration(Some(7)),
            Err(AppError::Core(CoreError::Unsupported { kind: "duration", ref valid, .. })) if valid == &["5", "10"]
        );
    }

    #[test]
    fn images_are_normalized_to_urls() {
        assert_eq!(normalize_image("https://x.test/a.png"), "https://x.test/a.png");
        assert_eq!(normalize_image("data:image/png;base64,AA"), "data:image/png;base64,AA");
        assert_eq!(normalize_image("/9j/4AAQ"), "data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(normalize_image("iVBORw0K"), "data:image/png;base64,iVBORw0K");
    }

    #[test]
    fn set_opt_skips_none() {
        let mut input = json!({ "prompt": "p" });
        set_opt(&mut input, "aspect_ratio", Some("16:9"));
        set_opt::<String>(&mut input, "negative_prompt", None);
        assert_eq!(input, json!({ "prompt": "p", "aspect_ratio": "16:9" }));
    }
}
