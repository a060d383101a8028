//! Repository for the `videos` table.

use mediaforge_core::types::DbId;
use sqlx::PgPool;

use crate::models::video::{CreateVideo, Video};

const COLUMNS: &str = "id, user_id, title, provider, model, prompt, source_url, \
     storage_key, public_url, content_type, size_bytes, created_at";

/// Video records are insert-only; deletion removes the row and hands it back
/// so the caller can clean up the stored object.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a record. `storage_key` is only ever a key the server itself
    /// persisted for `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateVideo,
        storage_key: Option<&str>,
    ) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos \
                (user_id, title, provider, model, prompt, source_url, storage_key, \
                 public_url, content_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'video/mp4'), $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.provider)
            .bind(&input.model)
            .bind(&input.prompt)
            .bind(&input.source_url)
            .bind(storage_key)
            .bind(&input.public_url)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's videos, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a video, returning the removed row if it existed.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "DELETE FROM videos WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
