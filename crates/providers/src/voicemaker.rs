//! VoiceMaker text-to-speech.
//!
//! VoiceMaker renders the audio itself and answers with a download `path`.

use serde::{Deserialize, Serialize};

use crate::{parse_response, require_key, Endpoint, ProviderError};

const PROVIDER: &str = "voicemaker";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SynthesisRequest<'a> {
    engine: &'a str,
    voice_id: &'a str,
    language_code: &'a str,
    text: &'a str,
    output_format: &'static str,
    sample_rate: &'static str,
    effect: &'static str,
    master_speed: &'static str,
    master_volume: &'static str,
    master_pitch: &'static str,
}

#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    #[serde(default)]
    success: bool,
    path: Option<String>,
    message: Option<String>,
}

/// One synthesis request.
#[derive(Debug, Clone, Copy)]
pub struct Speech<'a> {
    /// `neural` or `standard`.
    pub engine: &'a str,
    pub voice_id: &'a str,
    pub language_code: &'a str,
    pub text: &'a str,
}

pub struct VoiceMakerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl VoiceMakerClient {
    pub fn new(http: reqwest::Client, endpoint: &Endpoint) -> Self {
        Self {
            http,
            base_url: endpoint.base_url.clone(),
            api_key: endpoint.api_key.clone(),
        }
    }

    /// Synthesize `speech` as MP3 and return the hosted file URL.
    pub async fn synthesize(&self, speech: Speech<'_>) -> Result<String, ProviderError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let request = SynthesisRequest {
            engine: speech.engine,
            voice_id: speech.voice_id,
            language_code: speech.language_code,
            text: speech.text,
            output_format: "mp3",
            sample_rate: "48000",
            effect: "default",
            master_speed: "0",
            master_volume: "0",
            master_pitch: "0",
        };

        let response = self
            .http
            .post(format!("{}/voice/api", self.base_url))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;
        let body: SynthesisResponse = parse_response(PROVIDER, response).await?;

        match body.path {
            Some(path) if body.success => Ok(path),
            _ => Err(ProviderError::unexpected(
                PROVIDER,
                body.message.unwrap_or_else(|| "synthesis failed".to_string()),
            )),
        }
    }
}
