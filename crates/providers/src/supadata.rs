//! Supadata YouTube transcripts.

use serde::{Deserialize, Serialize};

use crate::{parse_response, require_key, Endpoint, ProviderError};

const PROVIDER: &str = "supadata";

/// Plain-text transcript of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub content: String,
    #[serde(default)]
    pub lang: Option<String>,
}

pub struct SupadataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SupadataClient {
    pub fn new(http: reqwest::Client, endpoint: &Endpoint) -> Self {
        Self {
            http,
            base_url: endpoint.base_url.clone(),
            api_key: endpoint.api_key.clone(),
        }
    }

    pub async fn youtube_transcript(&self, video_url: &str) -> Result<Transcript, ProviderError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let response = self
            .http
            .get(format!("{}/youtube/transcript", self.base_url))
            .query(&[("url", video_url), ("text", "true")])
            .header("x-api-key", key)
            .send()
            .await?;
        parse_response(PROVIDER, response).await
    }
}
