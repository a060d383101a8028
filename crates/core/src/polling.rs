//! Submit / poll / resolve loop for queue-based generation providers.
//!
//! Queue providers (FAL, Replicate) accept a job, hand back a request id,
//! and expose a status endpoint. [`generate`] drives one job end to end:
//! submit, poll every [`PollPolicy::interval`] until a terminal status or
//! the attempt budget runs out, then fetch the result and pull a media URL
//! out of it. Provider-specific HTTP lives behind [`QueueBackend`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::media::extract_media_url;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Status checks before giving up (~15 minutes at the default interval).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 180;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Normalized job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    /// Classify a provider status string. Unknown values count as running.
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" | "succeeded" | "success" | "ok" => Self::Succeeded,
            "failed" | "error" | "canceled" | "cancelled" => Self::Failed,
            "in_queue" | "queued" | "starting" | "pending" => Self::Queued,
            _ => Self::Running,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// A status report from a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub state: JobState,
    /// Status string exactly as the provider sent it.
    pub raw: String,
    /// Provider-supplied failure reason, if any.
    pub detail: Option<String>,
}

impl JobStatus {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            state: JobState::classify(&raw),
            raw,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(d) => write!(f, "{} ({d})", self.raw),
            None => f.write_str(&self.raw),
        }
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The three calls a queue provider must support.
///
/// Implementations are bound to a single model, so `submit` only takes the
/// input payload.
#[async_trait]
pub trait QueueBackend: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short provider name used in logs.
    fn provider(&self) -> &str;

    /// Queue a job and return its external request id.
    async fn submit(&self, input: &Value) -> Result<String, Self::Error>;

    /// Current status of a queued job.
    async fn status(&self, request_id: &str) -> Result<JobStatus, Self::Error>;

    /// Result payload of a finished job.
    async fn result(&self, request_id: &str) -> Result<Value, Self::Error>;
}

// ---------------------------------------------------------------------------
// Policy and errors
// ---------------------------------------------------------------------------

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Why a job did not produce a media URL.
#[derive(Debug, thiserror::Error)]
pub enum PollError<E: std::error::Error + 'static> {
    /// A submit/status/result call failed.
    #[error(transparent)]
    Backend(E),

    /// The provider reported a failure terminal status.
    #[error("Job {request_id} failed with status {status}")]
    Failed { request_id: String, status: JobStatus },

    /// The attempt budget ran out before a terminal status.
    #[error("Job {request_id} did not finish after {attempts} attempts (last status: {last_status})")]
    TimedOut {
        request_id: String,
        attempts: u32,
        last_status: String,
    },

    /// The job succeeded but the result held no recognizable media URL.
    #[error("Job {request_id} completed but returned no media URL")]
    MissingMediaUrl { request_id: String, payload: Value },
}

/// A finished job's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMedia {
    pub request_id: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Poll `request_id` until it reaches a terminal status, then return the
/// result payload.
///
/// Makes at most `policy.max_attempts` status calls and never sleeps after
/// the last one.
pub async fn poll_until_terminal<B>(
    backend: &B,
    request_id: &str,
    policy: PollPolicy,
) -> Result<Value, PollError<B::Error>>
where
    B: QueueBackend + ?Sized,
{
    let mut last_status = String::from("unknown");

    for attempt in 1..=policy.max_attempts {
        let status = backend
            .status(request_id)
            .await
            .map_err(PollError::Backend)?;

        tracing::debug!(
            provider = backend.provider(),
            request_id,
            attempt,
            status = %status.raw,
            "Polled job status"
        );

        match status.state {
            JobState::Succeeded => {
                return backend.result(request_id).await.map_err(PollError::Backend);
            }
            JobState::Failed => {
                tracing::warn!(
                    provider = backend.provider(),
                    request_id,
                    status = %status,
                    "Job reached failure status"
                );
                return Err(PollError::Failed {
                    request_id: request_id.to_string(),
                    status,
                });
            }
            JobState::Queued | JobState::Running => {
                last_status = status.raw;
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    tracing::warn!(
        provider = backend.provider(),
        request_id,
        attempts = policy.max_attempts,
        last_status = %last_status,
        "Job polling timed out"
    );
    Err(PollError::TimedOut {
        request_id: request_id.to_string(),
        attempts: policy.max_attempts,
        last_status,
    })
}

/// Submit `input`, poll to completion, and extract the media URL.
pub async fn generate<B>(
    backend: &B,
    input: &Value,
    policy: PollPolicy,
) -> Result<GeneratedMedia, PollError<B::Error>>
where
    B: QueueBackend + ?Sized,
{
    let request_id = backend.submit(input).await.map_err(PollError::Backend)?;
    tracing::info!(provider = backend.provider(), request_id = %request_id, "Job submitted");

    let payload = poll_until_terminal(backend, &request_id, policy).await?;

    match extract_media_url(&payload) {
        Some(url) => {
            tracing::info!(provider = backend.provider(), request_id = %request_id, "Job completed");
            Ok(GeneratedMedia { request_id, url })
        }
        None => Err(PollError::MissingMediaUrl {
            request_id,
            payload,
        }),
    }
}
