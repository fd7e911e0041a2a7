//! History listing for authenticated users.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use fitcheck_db::models::history::HistoryEntry;
use fitcheck_db::repositories::HistoryRepo;

use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Page size when the client sends none.
const DEFAULT_LIMIT: i64 = 10;
/// Hard page-size ceiling.
const MAX_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryRequest {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/get-history
///
/// Returns the caller's scans and style results as one reverse-
/// chronological page. The body is optional; limits are clamped.
pub async fn get_history(
    State(state): State<AppState>,
    user: AuthUser,
    body: Option<Json<HistoryRequest>>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = req.offset.unwrap_or(0).max(0);

    let entries = HistoryRepo::list_for_user(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(entries))
}
