//! Copy provider output into durable storage.
//!
//! Provider URLs expire, so every finished job's media is downloaded and
//! re-uploaded under a fresh key. A failure here never fails the request:
//! the caller gets the original URL back with `artifact == None` and the
//! problem is logged. Nothing retries or cleans up afterwards.

use std::sync::Arc;

use base64::Engine;
use mediaforge_core::media::{
    content_type_for_extension, data_uri, parse_data_uri, resolve_content_type, storage_key,
};
use uuid::Uuid;

use crate::{ObjectStore, StorageError};

/// Where an artifact belongs in the bucket.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSpec<'a> {
    /// Top-level folder, e.g. `generated-videos`.
    pub folder: &'a str,
    pub provider: &'a str,
    pub model: &'a str,
    /// File extension without the dot, e.g. `mp4`.
    pub extension: &'a str,
}

/// A successfully persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub id: Uuid,
    /// Provider URL the bytes came from; `None` for inline payloads.
    pub source_url: Option<String>,
    pub key: String,
    pub public_url: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// Outcome of a persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persisted {
    /// URL to hand back to the client: durable if persisted, original otherwise.
    pub url: String,
    pub artifact: Option<StoredArtifact>,
}

impl Persisted {
    pub fn is_durable(&self) -> bool {
        self.artifact.is_some()
    }

    fn fallback(url: String) -> Self {
        Self {
            url,
            artifact: None,
        }
    }
}

impl From<StoredArtifact> for Persisted {
    fn from(artifact: StoredArtifact) -> Self {
        Self {
            url: artifact.public_url.clone(),
            artifact: Some(artifact),
        }
    }
}

/// Downloads provider media and uploads it to an [`ObjectStore`].
///
/// Without a store every artifact takes the fallback path.
#[derive(Clone)]
pub struct ArtifactPersister {
    http: reqwest::Client,
    store: Option<Arc<dyn ObjectStore>>,
}

impl ArtifactPersister {
    pub fn new(http: reqwest::Client, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            http,
            store: Some(store),
        }
    }

    /// A persister with no backing store.
    pub fn disabled(http: reqwest::Client) -> Self {
        Self { http, store: None }
    }

    pub fn store(&self) -> Option<&Arc<dyn ObjectStore>> {
        self.store.as_ref()
    }

    /// Persist the media at `source_url`. Falls back to `source_url`.
    ///
    /// `data:` URIs are decoded and uploaded directly.
    pub async fn persist_url(&self, source_url: &str, spec: ArtifactSpec<'_>) -> Persisted {
        if self.store.is_none() {
            tracing::debug!(provider = spec.provider, "No object store, returning provider URL");
            return Persisted::fallback(source_url.to_string());
        }

        let attempt = match parse_data_uri(source_url) {
            Some((content_type, payload)) => self.upload_base64(payload, content_type, None, spec).await,
            None => self.download_and_upload(source_url, spec).await,
        };

        match attempt {
            Ok(artifact) => {
                tracing::info!(
                    key = %artifact.key,
                    size_bytes = artifact.size_bytes,
                    "Artifact persisted"
                );
                artifact.into()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = spec.provider,
                    model = spec.model,
                    "Artifact persistence failed, returning provider URL"
                );
                Persisted::fallback(source_url.to_string())
            }
        }
    }

    /// Persist an inline base64 payload. Falls back to a `data:` URI.
    pub async fn persist_base64(
        &self,
        payload: &str,
        content_type: Option<&str>,
        spec: ArtifactSpec<'_>,
    ) -> Persisted {
        let content_type =
            content_type.unwrap_or_else(|| content_type_for_extension(spec.extension));
        if self.store.is_none() {
            tracing::debug!(provider = spec.provider, "No object store, returning data URI");
            return Persisted::fallback(data_uri(content_type, payload));
        }

        match self.upload_base64(payload, content_type, None, spec).await {
            Ok(artifact) => {
                tracing::info!(key = %artifact.key, "Inline artifact persisted");
                artifact.into()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = spec.provider,
                    "Inline artifact persistence failed, returning data URI"
                );
                Persisted::fallback(data_uri(content_type, payload))
            }
        }
    }

    async fn download_and_upload(
        &self,
        source_url: &str,
        spec: ArtifactSpec<'_>,
    ) -> Result<StoredArtifact, StorageError> {
        let response = self.http.get(source_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Download {
                url: source_url.to_string(),
                status: status.as_u16(),
            });
        }

        let header = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = resolve_content_type(header.as_deref(), spec.extension);
        let bytes = response.bytes().await?.to_vec();

        self.upload(bytes, &content_type, Some(source_url.to_string()), spec)
            .await
    }

    async fn upload_base64(
        &self,
        payload: &str,
        content_type: &str,
        source_url: Option<String>,
        spec: ArtifactSpec<'_>,
    ) -> Result<StoredArtifact, StorageError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
        self.upload(bytes, content_type, source_url, spec).await
    }

    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        source_url: Option<String>,
        spec: ArtifactSpec<'_>,
    ) -> Result<StoredArtifact, StorageError> {
        let store = self.store.as_ref().ok_or(StorageError::NotConfigured)?;
        let id = Uuid::new_v4();
        let key = storage_key(spec.folder, spec.provider, spec.model, id, spec.extension);
        let stored = store.put(&key, bytes, content_type).await?;

        Ok(StoredArtifact {
            id,
            source_url,
            key: stored.key,
            public_url: stored.public_url,
            content_type: stored.content_type,
            size_bytes: stored.size_bytes,
        })
    }
}
