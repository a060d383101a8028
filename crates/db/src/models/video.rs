//! Generated video records.

use mediaforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `videos` table. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: DbId,
    pub user_id: DbId,
    pub title: Option<String>,
    pub provider: String,
    pub model: String,
    pub prompt: Option<String>,
    /// Provider URL the artifact was downloaded from.
    pub source_url: Option<String>,
    /// Object key in durable storage, absent when persistence fell back.
    pub storage_key: Option<String>,
    pub public_url: String,
    pub content_type: String,
    pub size_bytes: Option<i64>,
    pub created_at: Timestamp,
}

/// DTO for recording a generated video.
///
/// There is no storage key here: only the server records which stored
/// object a row owns, when it persists an authenticated generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideo {
    pub title: Option<String>,
    pub provider: String,
    pub model: String,
    pub prompt: Option<String>,
    pub source_url: Option<String>,
    pub public_url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}
