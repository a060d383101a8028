//! Google Cloud Text-to-Speech.
//!
//! Returns the audio inline as base64 MP3; nothing is hosted.

use serde::Deserialize;
use serde_json::json;

use crate::{parse_response, require_key, Endpoint, ProviderError};

const PROVIDER: &str = "google";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

pub struct GoogleTtsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleTtsClient {
    pub fn new(http: reqwest::Client, endpoint: &Endpoint) -> Self {
        Self {
            http,
            base_url: endpoint.base_url.clone(),
            api_key: endpoint.api_key.clone(),
        }
    }

    /// Synthesize `text` with the named voice (e.g. `en-US-Neural2-C`).
    /// Returns base64-encoded MP3.
    pub async fn synthesize(
        &self,
        text: &str,
        voice_name: &str,
        language_code: &str,
    ) -> Result<String, ProviderError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let body = json!({
            "input": { "text": text },
            "voice": { "languageCode": language_code, "name": voice_name },
            "audioConfig": { "audioEncoding": "MP3" },
        });

        let response = self
            .http
            .post(format!("{}/text:synthesize", self.base_url))
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;
        let synthesized: SynthesizeResponse = parse_response(PROVIDER, response).await?;

        synthesized
            .audio_content
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ProviderError::unexpected(PROVIDER, "response has no audioContent"))
    }
}

/// Language code implied by a voice name: `en-US-Neural2-C` -> `en-US`.
pub fn language_from_voice(voice_name: &str) -> Option<String> {
    let mut parts = voice_name.splitn(3, '-');
    let lang = parts.next()?;
    let region = parts.next()?;
    parts.next()?;
    Some(format!("{lang}-{region}"))
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::collections::HashMap;

    use super::*;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    #[test]
    fn language_is_derived_from_voice_name() {
        assert_eq!(language_from_voice("en-US-Neural2-C").as_deref(), Some("en-US"));
        assert_eq!(language_from_voice("de-DE-Wavenet-A").as_deref(), Some("de-DE"));
        assert_eq!(language_from_voice("Joanna"), None);
    }

    #[tokio::test]
    async fn passes_key_as_query_and_returns_audio() {
        let router = Router::new().route(
            "/text:synthesize",
            post(|Query(q): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                if q.get("key").map(String::as_str) != Some("g-key") {
                    return Err(StatusCode::FORBIDDEN);
                }
                assert_eq!(body["voice"]["name"], "en-US-Neural2-C");
                Ok(Json(json!({ "audioContent": "SUQz" })))
            }),
        );
        let base = spawn(router).await;
        let client = GoogleTtsClient::new(reqwest::Client::new(), &Endpoint::new(&base, Some("g-key".into())));

        let audio = client.synthesize("hi", "en-US-Neural2-C", "en-US").await.unwrap();
        assert_eq!(audio, "SUQz");
    }
}
