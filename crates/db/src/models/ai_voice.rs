//! AI voice preset models and DTOs.

use mediaforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ai_voices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiVoice {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub provider: String,
    pub voice_id: String,
    pub language: Option<String>,
    pub gender: Option<String>,
    pub settings: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a voice preset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAiVoice {
    pub name: String,
    pub provider: String,
    pub voice_id: String,
    pub language: Option<String>,
    pub gender: Option<String>,
    pub settings: Option<serde_json::Value>,
}

/// DTO for updating a voice preset. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAiVoice {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub voice_id: Option<String>,
    pub language: Option<String>,
    pub gender: Option<String>,
    pub settings: Option<serde_json::Value>,
}
