//! Repository for the `scripts` table.

use mediaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::script::{CreateScript, Script, UpdateScript};

const COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";

pub struct ScriptRepo;

impl ScriptRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateScript,
    ) -> Result<Script, sqlx::Error> {
        let query = format!(
            "INSERT INTO scripts (user_id, title, content) \
             VALUES ($1, $2, COALESCE($3, '')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scripts WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Script>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scripts \
             WHERE user_id = $1 \
             ORDER BY updated_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a script. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateScript,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = format!(
            "UPDATE scripts SET \
                title = COALESCE($3, title), \
                content = COALESCE($4, content), \
                updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scripts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
