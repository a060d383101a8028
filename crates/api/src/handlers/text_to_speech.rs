//! Text-to-speech provider sub-routes.

use axum::extract::State;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::registry::Capability;
use mediaforge_providers::google_tts::language_from_voice;
use mediaforge_providers::voicemaker::Speech;
use mediaforge_storage::persist::ArtifactSpec;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::generation::{persist_hosted, provider_entry, require_text, AudioGenerated};
use crate::state::AppState;

/// Longest text accepted in one synthesis call.
pub const MAX_SPEECH_CHARS: usize = 5_000;

const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToSpeechRequest {
    pub text: Option<String>,
    pub voice_id: Option<String>,
    pub language_code: Option<String>,
    pub model: Option<String>,
}

fn require_speech_text(text: Option<&str>) -> AppResult<&str> {
    let text = require_text("text", text)?;
    let len = text.chars().count();
    if len > MAX_SPEECH_CHARS {
        return Err(CoreError::Validation(format!(
            "text must be at most {MAX_SPEECH_CHARS} characters (got {len})"
        ))
        .into());
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// POST /api/text-to-speech/providers/voicemaker
// ---------------------------------------------------------------------------

pub async fn voicemaker(
    State(state): State<AppState>,
    AppJson(req): AppJson<TextToSpeechRequest>,
) -> AppResult<Json<AudioGenerated>> {
    let entry = provider_entry(Capability::TextToSpeech, "voicemaker")?;
    let engine = entry.resolve_model(req.model.as_deref())?;
    let text = require_speech_text(req.text.as_deref())?;
    let voice_id = require_text("voiceId", req.voice_id.as_deref())?;
    let language_code = req.language_code.as_deref().unwrap_or(DEFAULT_LANGUAGE);

    let url = state
        .providers
        .voicemaker
        .synthesize(Speech {
            engine,
            voice_id,
            language_code,
            text,
        })
        .await?;

    let persisted =
        persist_hosted(&state, Capability::TextToSpeech, "voicemaker", engine, &url, "mp3").await;
    tracing::info!(voice_id, persisted = persisted.is_durable(), "Speech synthesized");
    Ok(Json(AudioGenerated::new("voicemaker", engine, persisted)))
}

// ---------------------------------------------------------------------------
// POST /api/text-to-speech/providers/google
// ---------------------------------------------------------------------------

pub async fn google(
    State(state): State<AppState>,
    AppJson(req): AppJson<TextToSpeechRequest>,
) -> AppResult<Json<AudioGenerated>> {
    let entry = provider_entry(Capability::TextToSpeech, "google")?;
    let model = entry.resolve_model(req.model.as_deref())?;
    let text = require_speech_text(req.text.as_deref())?;
    let voice_id = require_text("voiceId", req.voice_id.as_deref())?;
    let language_code = req
        .language_code
        .clone()
        .or_else(|| language_from_voice(voice_id))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let audio = state
        .providers
        .google_tts
        .synthesize(text, voice_id, &language_code)
        .await?;

    let spec = ArtifactSpec {
        folder: Capability::TextToSpeech.storage_folder(),
        provider: "google",
        model,
        extension: "mp3",
    };
    let persisted = state.persister.persist_base64(&audio, Some("audio/mpeg"), spec).await;
    tracing::info!(voice_id, persisted = persisted.is_durable(), "Speech synthesized");
    Ok(Json(AudioGenerated::new("google", model, persisted)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_text_is_bounded() {
        assert_eq!(require_speech_text(Some(" hi ")).unwrap(), "hi");
        let long = "a".repeat(MAX_SPEECH_CHARS + 1);
        assert!(require_speech_text(Some(&long)).is_err());
    }
}
