//! HTTP clients for the hosted AI and media providers.
//!
//! Every client shares one [`reqwest::Client`], maps non-2xx responses to
//! [`ProviderError::Api`], and reports [`ProviderError::NotConfigured`] when
//! its API key is missing. Queue-based providers (FAL, Replicate) implement
//! [`mediaforge_core::polling::QueueBackend`].

pub mod fal;
pub mod firecrawl;
pub mod google_tts;
pub mod openai;
pub mod replicate;
pub mod settings;
pub mod supadata;
pub mod voicemaker;

use serde::de::DeserializeOwned;

pub use settings::{Endpoint, ProviderSettings};

/// Longest provider error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 2_000;

/// Errors from provider API calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// No API key is configured for this provider.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A 2xx response that did not contain what we asked for.
    #[error("Unexpected {provider} response: {message}")]
    UnexpectedResponse {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub(crate) fn unexpected(provider: &'static str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            provider,
            message: message.into(),
        }
    }
}

/// Every provider client, built once at startup.
pub struct Providers {
    pub fal: fal::FalClient,
    pub replicate: replicate::ReplicateClient,
    pub openai: openai::OpenAiClient,
    pub voicemaker: voicemaker::VoiceMakerClient,
    pub google_tts: google_tts::GoogleTtsClient,
    pub firecrawl: firecrawl::FirecrawlClient,
    pub supadata: supadata::SupadataClient,
}

impl Providers {
    pub fn new(http: reqwest::Client, settings: &ProviderSettings) -> Self {
        Self {
            fal: fal::FalClient::new(http.clone(), &settings.fal_queue, &settings.fal_run),
            replicate: replicate::ReplicateClient::new(http.clone(), &settings.replicate),
            openai: openai::OpenAiClient::new(http.clone(), &settings.openai),
            voicemaker: voicemaker::VoiceMakerClient::new(http.clone(), &settings.voicemaker),
            google_tts: google_tts::GoogleTtsClient::new(http.clone(), &settings.google_tts),
            firecrawl: firecrawl::FirecrawlClient::new(http.clone(), &settings.firecrawl),
            supadata: supadata::SupadataClient::new(http, &settings.supadata),
        }
    }
}

// ---- shared response helpers ----

/// Return the response unchanged on success, or [`ProviderError::Api`]
/// carrying the status and (truncated) body.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        tracing::warn!(provider, status = status.as_u16(), "Provider returned error status");
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(provider, response).await?;
    Ok(response.json::<T>().await?)
}

/// Resolve an optional API key or fail with [`ProviderError::NotConfigured`].
pub(crate) fn require_key<'a>(
    provider: &'static str,
    key: &'a Option<String>,
) -> Result<&'a str, ProviderError> {
    key.as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(ProviderError::NotConfigured(provider))
}
