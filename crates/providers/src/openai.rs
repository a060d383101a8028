//! OpenAI image generation.

use serde::Deserialize;
use serde_json::json;

use crate::{parse_response, require_key, Endpoint, ProviderError};

const PROVIDER: &str = "openai";

/// Image size used when the caller does not pick one.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Sizes accepted by both `dall-e-3` and `gpt-image-1`.
pub const SUPPORTED_SIZES: &[&str] = &["1024x1024", "1024x1792", "1792x1024"];

/// Where the generated image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutput {
    /// Short-lived URL hosted by OpenAI.
    Url(String),
    /// Inline base64 PNG (`gpt-image-1` always answers this way).
    Base64(String),
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
    b64_json: Option<String>,
}

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, endpoint: &Endpoint) -> Self {
        Self {
            http,
            base_url: endpoint.base_url.clone(),
            api_key: endpoint.api_key.clone(),
        }
    }

    /// Generate a single image.
    pub async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        size: &str,
    ) -> Result<ImageOutput, ProviderError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let mut body = json!({ "model": model, "prompt": prompt, "n": 1, "size": size });
        // gpt-image-1 rejects response_format.
        if model.starts_with("dall-e") {
            body["response_format"] = json!("url");
        }

        let response = self
            .http
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        let images: ImagesResponse = parse_response(PROVIDER, response).await?;

        let first = images
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::unexpected(PROVIDER, "no images returned"))?;
        match (first.url, first.b64_json) {
            (Some(url), _) => Ok(ImageOutput::Url(url)),
            (None, Some(b64)) => Ok(ImageOutput::Base64(b64)),
            (None, None) => Err(ProviderError::unexpected(
                PROVIDER,
                "image has neither url nor b64_json",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    use super::*;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    /// Echo the request's `response_format` back as the URL, or b64 if absent.
    async fn images(Json(body): Json<Value>) -> Json<Value> {
        match body.get("response_format") {
            Some(_) => Json(json!({ "data": [{ "url": "https://oaidalle.test/img.png" }] })),
            None => Json(json!({ "data": [{ "b64_json": "iVBORw0KGgo=" }] })),
        }
    }

    fn client(base: &str) -> OpenAiClient {
        OpenAiClient::new(reqwest::Client::new(), &Endpoint::new(base, Some("sk-test".into())))
    }

    #[tokio::test]
    async fn dall_e_returns_url() {
        let base = spawn(Router::new().route("/images/generations", post(images))).await;
        let out = client(&base)
            .generate_image("dall-e-3", "a lighthouse", DEFAULT_IMAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(out, ImageOutput::Url("https://oaidalle.test/img.png".into()));
    }

    #[tokio::test]
    async fn gpt_image_returns_base64() {
        let base = spawn(Router::new().route("/images/generations", post(images))).await;
        let out = client(&base)
            .generate_image("gpt-image-1", "a lighthouse", DEFAULT_IMAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(out, ImageOutput::Base64("iVBORw0KGgo=".into()));
    }

    #[tokio::test]
    async fn empty_data_is_unexpected() {
        let base = spawn(Router::new().route(
            "/images/generations",
            post(|| async { Json(json!({ "data": [] })) }),
        ))
        .await;
        let err = client(&base)
            .generate_image("dall-e-3", "x", DEFAULT_IMAGE_SIZE)
            .await
            .unwrap_err();
        assert_matches!(err, ProviderError::UnexpectedResponse { provider: "openai", .. });
    }
}
