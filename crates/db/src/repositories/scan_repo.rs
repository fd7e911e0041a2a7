//! Repository for the `scans` table.

use sqlx::PgPool;

use fitcheck_core::types::RecordId;

use crate::models::scan::{CreateScan, Scan};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, image_url, language, occasion, user_id, user_name, \
    ai_results, ip_address, created_at";

/// Provides persistence operations for scans.
pub struct ScanRepo;

impl ScanRepo {
    /// Insert a new scan, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateScan) -> Result<Scan, sqlx::Error> {
        let query = format!(
            "INSERT INTO scans
                (image_url, language, occasion, user_id, user_name, ai_results, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scan>(&query)
            .bind(&input.image_url)
            .bind(&input.language)
            .bind(&input.occasion)
            .bind(input.user_id)
            .bind(&input.user_name)
            .bind(&input.ai_results)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Find a scan by id.
    pub async fn find_by_id(pool: &PgPool, id: RecordId) -> Result<Option<Scan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scans WHERE id = $1");
        sqlx::query_as::<_, Scan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a scan by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
