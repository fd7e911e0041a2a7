//! Health endpoint behavior without a reachable database.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, test_config};

/// The endpoint always answers 200; an unreachable database reads as
/// degraded rather than an error.
#[tokio::test]
async fn test_health_degraded_without_db() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
