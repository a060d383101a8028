//! Durable object storage for generated media.
//!
//! [`ObjectStore`] is the seam between the API and the bucket backend.
//! [`supabase::SupabaseStore`] talks to Supabase Storage over REST and
//! [`memory::MemoryStore`] keeps objects in process for tests. [`persist::ArtifactPersister`] copies provider output into a store.

pub mod memory;
pub mod persist;
pub mod supabase;

use async_trait::async_trait;

/// Errors from storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage service returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Downloading the source artifact failed.
    #[error("Download of {url} failed with HTTP {status}")]
    Download { url: String, status: u16 },

    /// Inline payload was not valid base64.
    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    /// No object store is configured.
    #[error("Object storage is not configured")]
    NotConfigured,
}

/// Metadata of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// A bucket that can hold generated media.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `bytes` under `key`. An existing key is an error, never
    /// overwritten.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Remove the object at `key`.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL an object at `key` is (or would be) served from.
    fn public_url(&self, key: &str) -> String;
}
