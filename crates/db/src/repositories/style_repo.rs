//! Repository for the `styles` table.

use sqlx::PgPool;

use fitcheck_core::types::RecordId;

use crate::models::style::{CreateStyle, Style};

const COLUMNS: &str = "id, user_id, image_url, generated_image_url, request_text, \
    language, result, ip_address, created_at";

/// Provides persistence operations for style records.
pub struct StyleRepo;

impl StyleRepo {
    /// Insert a new style record, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStyle) -> Result<Style, sqlx::Error> {
        let query = format!(
            "INSERT INTO styles
                (user_id, image_url, generated_image_url, request_text, language, result, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Style>(&query)
            .bind(input.user_id)
            .bind(&input.image_url)
            .bind(&input.generated_image_url)
            .bind(&input.request_text)
            .bind(&input.language)
            .bind(&input.result)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Find a style record by id.
    pub async fn find_by_id(pool: &PgPool, id: RecordId) -> Result<Option<Style>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM styles WHERE id = $1");
        sqlx::query_as::<_, Style>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a style record by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM styles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
