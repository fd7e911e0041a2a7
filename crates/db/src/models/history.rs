//! Unioned history rows for the authenticated user's past results.

use serde::Serialize;
use sqlx::FromRow;

use fitcheck_core::types::{RecordId, Timestamp};

/// One entry of the unioned scans + styles history listing.
///
/// `kind` is `"scan"` or `"style"`; `label` carries the scan occasion or
/// the style request text; `payload` is the stored AI result JSON.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: RecordId,
    pub kind: String,
    pub image_url: String,
    pub label: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
