//! Record retrieval and scan deletion.
//!
//! Retrieval is deliberately shareable: a record id is an unguessable
//! UUID, so results can be linked without an account. Shared reads get
//! a projection of the row, never the raw row -- the requester identity
//! columns (`ip_address`, `user_id`) stay server-side. Deletion stays
//! owner-only.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use fitcheck_core::locale::{ErrorCode, Language};
use fitcheck_core::types::{RecordId, Timestamp};
use fitcheck_db::models::scan::Scan;
use fitcheck_db::models::style::Style;
use fitcheck_db::repositories::{ScanRepo, StyleRepo};

use crate::error::{ApiError, ApiResult};
use crate::middleware::accept_language;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordRef {
    pub id: RecordId,
}

/// Shareable projection of a scan row.
#[derive(Debug, Serialize)]
pub struct SharedScan {
    pub id: RecordId,
    pub image_url: String,
    pub occasion: String,
    pub user_name: Option<String>,
    pub ai_results: serde_json::Value,
    pub created_at: Timestamp,
}

impl From<Scan> for SharedScan {
    fn from(scan: Scan) -> Self {
        Self {
            id: scan.id,
            image_url: scan.image_url,
            occasion: scan.occasion,
            user_name: scan.user_name,
            ai_results: scan.ai_results,
            created_at: scan.created_at,
        }
    }
}

/// Shareable projection of a style row.
#[derive(Debug, Serialize)]
pub struct SharedStyle {
    pub id: RecordId,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,
    pub request_text: String,
    pub result: serde_json::Value,
    pub created_at: Timestamp,
}

impl From<Style> for SharedStyle {
    fn from(style: Style) -> Self {
        Self {
            id: style.id,
            image_url: style.image_url,
            generated_image_url: style.generated_image_url,
            request_text: style.request_text,
            result: style.result,
            created_at: style.created_at,
        }
    }
}

/// Either kind of shared record, serialized as its projection.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SharedRecord {
    Scan(SharedScan),
    Style(SharedStyle),
}

/// Look up a record by id: scans first, then styles (the ids returned
/// by the restyle flow point at `styles` rows).
async fn fetch_record(
    state: &AppState,
    id: RecordId,
    lang: Language,
) -> ApiResult<SharedRecord> {
    if let Some(scan) = ScanRepo::find_by_id(&state.pool, id).await? {
        return Ok(SharedRecord::Scan(scan.into()));
    }
    if let Some(style) = StyleRepo::find_by_id(&state.pool, id).await? {
        return Ok(SharedRecord::Style(style.into()));
    }
    Err(ApiError::localized(ErrorCode::NotFound, lang))
}

/// POST /api/get-scan
pub async fn get_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RecordRef>, JsonRejection>,
) -> ApiResult<Json<SharedRecord>> {
    let lang = Language::resolve(None, accept_language(&headers));
    let Json(req) = body.map_err(|_| ApiError::localized(ErrorCode::InvalidJson, lang))?;
    Ok(Json(fetch_record(&state, req.id, lang).await?))
}

/// GET /api/get-scan?id=
pub async fn get_scan_by_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<RecordRef>, QueryRejection>,
) -> ApiResult<Json<SharedRecord>> {
    let lang = Language::resolve(None, accept_language(&headers));
    let Query(req) = query.map_err(|_| ApiError::localized(ErrorCode::InvalidJson, lang))?;
    Ok(Json(fetch_record(&state, req.id, lang).await?))
}

/// POST /api/delete-scan
///
/// Owner-only. The stored image blob is removed best-effort before the
/// row; a stuck blob never blocks the delete.
pub async fn delete_scan(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    body: Result<Json<RecordRef>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let lang = Language::resolve(None, accept_language(&headers));
    let Json(req) = body.map_err(|_| ApiError::localized(ErrorCode::InvalidJson, lang))?;

    let storage = super::require_storage(&state, lang)?;

    let scan = ScanRepo::find_by_id(&state.pool, req.id)
        .await?
        .ok_or_else(|| ApiError::localized(ErrorCode::NotFound, lang))?;
    if scan.user_id != Some(user.user_id) {
        return Err(ApiError::localized(ErrorCode::Forbidden, lang));
    }

    match storage.key_from_public_url(&scan.image_url) {
        Some(key) => {
            if let Err(e) = storage.delete(&[key]).await {
                tracing::warn!(error = %e, scan_id = %scan.id, "Blob delete failed, removing row anyway");
            }
        }
        None => {
            tracing::warn!(scan_id = %scan.id, url = %scan.image_url, "Could not derive storage key from image URL");
        }
    }

    ScanRepo::delete(&state.pool, scan.id).await?;

    Ok(Json(json!({ "success": true })))
}
