//! Unioned history listing across scans and styles.

use sqlx::PgPool;

use fitcheck_core::types::RecordId;

use crate::models::history::HistoryEntry;

/// Provides the reverse-chronological history listing.
pub struct HistoryRepo;

impl HistoryRepo {
    /// List an authenticated user's scans and style results, newest
    /// first, as one unioned page.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: RecordId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, HistoryEntry>(
            "SELECT id, 'scan'::text AS kind, image_url, occasion AS label,
                    ai_results AS payload, created_at
               FROM scans WHERE user_id = $1
             UNION ALL
             SELECT id, 'style'::text, image_url, request_text,
                    result, created_at
               FROM styles WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
