//! Saved prompt models and DTOs.

use mediaforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `prompts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub content: String,
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrompt {
    pub name: String,
    pub content: String,
    pub category: Option<String>,
}

/// DTO for updating a prompt. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrompt {
    pub name: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}
