//! Scan entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use fitcheck_core::types::{RecordId, Timestamp};

/// A row from the `scans` table. Immutable after creation except for
/// deletion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scan {
    pub id: RecordId,
    pub image_url: String,
    pub language: String,
    pub occasion: String,
    pub user_id: Option<RecordId>,
    pub user_name: Option<String>,
    pub ai_results: serde_json::Value,
    pub ip_address: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new scan.
#[derive(Debug, Clone)]
pub struct CreateScan {
    pub image_url: String,
    pub language: String,
    pub occasion: String,
    pub user_id: Option<RecordId>,
    pub user_name: Option<String>,
    pub ai_results: serde_json::Value,
    pub ip_address: String,
}
