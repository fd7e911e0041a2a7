//! Style entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use fitcheck_core::types::{RecordId, Timestamp};

/// A row from the `styles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Style {
    pub id: RecordId,
    pub user_id: Option<RecordId>,
    pub image_url: String,
    pub generated_image_url: Option<String>,
    pub request_text: String,
    pub language: String,
    pub result: serde_json::Value,
    pub ip_address: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new style record.
#[derive(Debug, Clone)]
pub struct CreateStyle {
    pub user_id: Option<RecordId>,
    pub image_url: String,
    pub generated_image_url: Option<String>,
    pub request_text: String,
    pub language: String,
    pub result: serde_json::Value,
    pub ip_address: String,
}
