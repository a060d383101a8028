//! Repository for the `prompts` table.

use mediaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};

const COLUMNS: &str = "id, user_id, name, content, category, created_at, updated_at";

/// Provides CRUD operations for saved prompts.
pub struct PromptRepo;

impl PromptRepo {
    /// Insert a new prompt, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreatePrompt,
    ) -> Result<Prompt, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompts (user_id, name, content, category) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.content)
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    /// Find a prompt owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's prompts, optionally filtered by category, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Prompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts \
             WHERE user_id = $1 AND ($2::text IS NULL OR category = $2) \
             ORDER BY updated_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(user_id)
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a prompt. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdatePrompt,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET \
                name = COALESCE($3, name), \
                content = COALESCE($4, content), \
                category = COALESCE($5, category), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.content)
            .bind(&input.category)
            .fetch_optional(pool)
            .await
    }

    /// Delete a prompt. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
