pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /analyze          POST  critique an outfit image (auth optional)
/// /recommend        POST  restyle an outfit image (auth optional)
/// /get-history      POST  caller's scans + styles (auth required)
/// /get-scan         POST  fetch a scan or style by id (shareable, no auth)
/// /get-scan?id=     GET   same, link-friendly
/// /delete-scan      POST  delete an owned scan (auth required)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(handlers::analyze::analyze))
        .route("/recommend", post(handlers::recommend::recommend))
        .route("/get-history", post(handlers::history::get_history))
        .route(
            "/get-scan",
            post(handlers::scan::get_scan).get(handlers::scan::get_scan_by_query),
        )
        .route("/delete-scan", post(handlers::scan::delete_scan))
}
