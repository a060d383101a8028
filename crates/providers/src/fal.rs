//! FAL client.
//!
//! Video models go through the queue API: `POST {queue}/{model}` returns a
//! `request_id`, and status/result live under the model's *app id* (its
//! first two path segments), e.g. `fal-ai/kling-video`. Image models use
//! the synchronous `POST {run}/{model}` endpoint.

use async_trait::async_trait;
use mediaforge_core::polling::{JobStatus, QueueBackend};
use serde::Deserialize;
use serde_json::Value;

use crate::{parse_response, require_key, Endpoint, ProviderError};

const PROVIDER: &str = "fal";

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for FAL's queue and run APIs.
pub struct FalClient {
    http: reqwest::Client,
    queue_url: String,
    run_url: String,
    api_key: Option<String>,
}

impl FalClient {
    /// Both endpoints share the queue endpoint's key.
    pub fn new(http: reqwest::Client, queue: &Endpoint, run: &Endpoint) -> Self {
        Self {
            http,
            queue_url: queue.base_url.clone(),
            run_url: run.base_url.clone(),
            api_key: queue.api_key.clone().or_else(|| run.api_key.clone()),
        }
    }

    pub fn is_configured(&self) -> bool {
        require_key(PROVIDER, &self.api_key).is_ok()
    }

    fn auth(&self) -> Result<String, ProviderError> {
        Ok(format!("Key {}", require_key(PROVIDER, &self.api_key)?))
    }

    /// A [`QueueBackend`] bound to `model`.
    pub fn queue<'a>(&'a self, model: &str) -> FalQueue<'a> {
        FalQueue {
            client: self,
            model: model.to_string(),
        }
    }

    /// Run `model` synchronously and return its raw result payload.
    pub async fn run(&self, model: &str, input: &Value) -> Result<Value, ProviderError> {
        let response = self
            .http
            .post(format!("{}/{}", self.run_url, model))
            .header(reqwest::header::AUTHORIZATION, self.auth()?)
            .json(input)
            .send()
            .await?;
        parse_response(PROVIDER, response).await
    }
}

/// App id used by the queue's status/result endpoints.
///
/// `fal-ai/kling-video/v1.6/standard/text-to-video` -> `fal-ai/kling-video`.
pub fn app_id(model: &str) -> String {
    model.split('/').take(2).collect::<Vec<_>>().join("/")
}

/// Queue operations for one FAL model.
pub struct FalQueue<'a> {
    client: &'a FalClient,
    model: String,
}

impl FalQueue<'_> {
    fn request_url(&self, request_id: &str) -> String {
        format!(
            "{}/{}/requests/{}",
            self.client.queue_url,
            app_id(&self.model),
            request_id
        )
    }
}

#[async_trait]
impl QueueBackend for FalQueue<'_> {
    type Error = ProviderError;

    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn submit(&self, input: &Value) -> Result<String, ProviderError> {
        let response = self
            .client
            .http
            .post(format!("{}/{}", self.client.queue_url, self.model))
            .header(reqwest::header::AUTHORIZATION, self.client.auth()?)
            .json(input)
            .send()
            .await?;
        let submitted: SubmitResponse = parse_response(PROVIDER, response).await?;
        Ok(submitted.request_id)
    }

    async fn status(&self, request_id: &str) -> Result<JobStatus, ProviderError> {
        let response = self
            .client
            .http
            .get(format!("{}/status", self.request_url(request_id)))
            .header(reqwest::header::AUTHORIZATION, self.client.auth()?)
            .send()
            .await?;
        let status: StatusResponse = parse_response(PROVIDER, response).await?;
        Ok(JobStatus::from_raw(status.status).with_detail(status.error))
    }

    async fn result(&self, request_id: &str) -> Result<Value, ProviderError> {
        let response = self
            .client
            .http
            .get(self.request_url(request_id))
            .header(reqwest::header::AUTHORIZATION, self.client.auth()?)
            .send()
            .await?;
        parse_response(PROVIDER, response).await
    }
}
