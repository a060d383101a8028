//! Replicate client.
//!
//! Predictions are created against the model's official endpoint
//! (`POST /models/{owner}/{name}/predictions`) and read back from
//! `GET /predictions/{id}`. The same prediction object carries both status
//! and `output`, so a completed job is fetched once more for its result.

use async_trait::async_trait;
use mediaforge_core::polling::{JobStatus, QueueBackend};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{parse_response, require_key, Endpoint, ProviderError};

const PROVIDER: &str = "replicate";

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Option<Value>,
}

impl Prediction {
    /// Replicate sends `error` as a string or an object; flatten to text.
    fn error_text(&self) -> Option<String> {
        match &self.error {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// HTTP client for the Replicate predictions API.
pub struct ReplicateClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl ReplicateClient {
    pub fn new(http: reqwest::Client, endpoint: &Endpoint) -> Self {
        Self {
            http,
            base_url: endpoint.base_url.clone(),
            api_token: endpoint.api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        require_key(PROVIDER, &self.api_token).is_ok()
    }

    /// A [`QueueBackend`] bound to `model` (`owner/name`).
    pub fn predictions<'a>(&'a self, model: &str) -> ReplicatePredictions<'a> {
        ReplicatePredictions {
            client: self,
            model: model.to_string(),
        }
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        let token = require_key(PROVIDER, &self.api_token)?;
        let response = self
            .http
            .get(format!("{}/predictions/{}", self.base_url, id))
            .bearer_auth(token)
            .send()
            .await?;
        parse_response(PROVIDER, response).await
    }
}

/// Prediction operations for one Replicate model.
pub struct ReplicatePredictions<'a> {
    client: &'a ReplicateClient,
    model: String,
}

#[async_trait]
impl QueueBackend for ReplicatePredictions<'_> {
    type Error = ProviderError;

    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn submit(&self, input: &Value) -> Result<String, ProviderError> {
        let token = require_key(PROVIDER, &self.client.api_token)?;
        let response = self
            .client
            .http
            .post(format!("{}/models/{}/predictions", self.client.base_url, self.model))
            .bearer_auth(token)
            .json(&json!({ "input": input }))
            .send()
            .await?;
        let prediction: Prediction = parse_response(PROVIDER, response).await?;
        Ok(prediction.id)
    }

    async fn status(&self, request_id: &str) -> Result<JobStatus, ProviderError> {
        let prediction = self.client.get_prediction(request_id).await?;
        let detail = prediction.error_text();
        Ok(JobStatus::from_raw(prediction.status).with_detail(detail))
    }

    async fn result(&self, request_id: &str) -> Result<Value, ProviderError> {
        let prediction = self.client.get_prediction(request_id).await?;
        if prediction.output.is_null() {
            return Err(ProviderError::unexpected(
                PROVIDER,
                format!("prediction {} has no output", prediction.id),
            ));
        }
        Ok(prediction.output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use assert_matches::assert_matches;
    use axum::extract::State;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use mediaforge_core::polling::{generate, PollError, PollPolicy};

    use super::*;

    #[derive(Clone, Default)]
    struct Mock {
        polls: Arc<AtomicU32>,
        submitted: Arc<Mutex<Option<Value>>>,
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn fast(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(5),
            max_attempts,
        }
    }

    fn client(base: &str) -> ReplicateClient {
        ReplicateClient::new(
            reqwest::Client::new(),
            &Endpoint::new(base, Some("r8_test".into())),
        )
    }

    #[tokio::test]
    async fn generate_wraps_input_and_reads_output() {
        let mock = Mock::default();
        let router = Router::new()
            .route(
                "/models/luma/ray/predictions",
                post(|State(m): State<Mock>, Json(body): Json<Value>| async move {
                    *m.submitted.lock().unwrap() = Some(body);
                    Json(json!({ "id": "p1", "status": "starting" }))
                }),
            )
            .route(
                "/predictions/p1",
                get(|State(m): State<Mock>| async move {
                    if m.polls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Json(json!({ "id": "p1", "status": "processing", "output": null }))
                    } else {
                        Json(json!({
                            "id": "p1",
                            "status": "succeeded",
                            "output": "https://replicate.delivery/p1.mp4"
                        }))
                    }
                }),
            )
            .with_state(mock.clone());
        let base = spawn(router).await;
        let replicate = client(&base);

        let media = generate(&replicate.predictions("luma/ray"), &json!({ "prompt": "waves" }), fast(5))
            .await
            .unwrap();

        assert_eq!(media.url, "https://replicate.delivery/p1.mp4");
        assert_eq!(
            mock.submitted.lock().unwrap().clone(),
            Some(json!({ "input": { "prompt": "waves" } }))
        );
    }

    #[tokio::test]
    async fn failed_prediction_reports_error() {
        let router = Router::new().route(
            "/predictions/p2",
            get(|| async { Json(json!({ "id": "p2", "status": "failed", "error": "out of memory" })) }),
        );
        let base = spawn(router).await;
        let replicate = client(&base);

        let backend = replicate.predictions("luma/ray");
        let err = mediaforge_core::polling::poll_until_terminal(&backend, "p2", fast(3))
            .await
            .unwrap_err();
        assert_matches!(err, PollError::Failed { ref status, .. } => {
            assert_eq!(status.detail.as_deref(), Some("out of memory"));
        });
    }

    #[tokio::test]
    async fn missing_token_is_not_configured() {
        let replicate = ReplicateClient::new(reqwest::Client::new(), &Endpoint::new("http://127.0.0.1:9", None));
        assert!(!replicate.is_configured());
        let err = replicate.predictions("luma/ray").submit(&json!({})).await.unwrap_err();
        assert_matches!(err, ProviderError::NotConfigured("replicate"));
    }
}
