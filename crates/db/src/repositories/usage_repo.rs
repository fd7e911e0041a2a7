//! Rolling request counts for the rate limiter.

use sqlx::PgPool;

use fitcheck_core::types::{RecordId, Timestamp};

/// Counts prior requests attributable to an identity.
pub struct UsageRepo;

impl UsageRepo {
    /// Count scans plus styles created after `since` that match the
    /// client address or, when authenticated, the user id.
    ///
    /// The caller treats any error here as fail-closed: a broken
    /// counting query must never mean "quota not exceeded".
    pub async fn count_since(
        pool: &PgPool,
        user_id: Option<RecordId>,
        ip_address: &str,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT
                (SELECT COUNT(*) FROM scans
                  WHERE created_at > $3
                    AND (ip_address = $2 OR ($1::uuid IS NOT NULL AND user_id = $1)))
              + (SELECT COUNT(*) FROM styles
                  WHERE created_at > $3
                    AND (ip_address = $2 OR ($1::uuid IS NOT NULL AND user_id = $1)))",
        )
        .bind(user_id)
        .bind(ip_address)
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
