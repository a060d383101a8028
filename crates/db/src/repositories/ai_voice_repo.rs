//! Repository for the `ai_voices` table.

use mediaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::ai_voice::{AiVoice, CreateAiVoice, UpdateAiVoice};

const COLUMNS: &str = "id, user_id, name, provider, voice_id, language, gender, \
     settings, created_at, updated_at";

/// Provides CRUD operations for voice presets.
pub struct AiVoiceRepo;

impl AiVoiceRepo {
    /// Insert a new voice preset, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateAiVoice,
    ) -> Result<AiVoice, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_voices \
                (user_id, name, provider, voice_id, language, gender, settings) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiVoice>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.provider)
            .bind(&input.voice_id)
            .bind(&input.language)
            .bind(&input.gender)
            .bind(&input.settings)
            .fetch_one(pool)
            .await
    }

    /// Find a voice preset owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<AiVoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_voices WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, AiVoice>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's voice presets, optionally for one provider.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        provider: Option<&str>,
    ) -> Result<Vec<AiVoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_voices \
             WHERE user_id = $1 AND ($2::text IS NULL OR provider = $2) \
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, AiVoice>(&query)
            .bind(user_id)
            .bind(provider)
            .fetch_all(pool)
            .await
    }

    /// Update a voice preset. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateAiVoice,
    ) -> Result<Option<AiVoice>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_voices SET \
                name = COALESCE($3, name), \
                provider = COALESCE($4, provider), \
                voice_id = COALESCE($5, voice_id), \
                language = COALESCE($6, language), \
                gender = COALESCE($7, gender), \
                settings = COALESCE($8, settings), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiVoice>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.provider)
            .bind(&input.voice_id)
            .bind(&input.language)
            .bind(&input.gender)
            .bind(&input.settings)
            .fetch_optional(pool)
            .await
    }

    /// Delete a voice preset. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ai_voices WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
