//! HTTP-level tests for the request validation and configuration error
//! paths. These all resolve before any database or provider call, so
//! they run against a lazily-connecting pool with no live services.

mod common;

use axum::http::StatusCode;
use base64::Engine;
use common::{body_json, get, post_json, post_json_auth, post_raw, test_config};
use serde_json::json;

use fitcheck_core::image::MAX_IMAGE_BYTES;

fn small_image() -> String {
    let bytes = vec![0u8; 64];
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

// ---------------------------------------------------------------------------
// Body validation
// ---------------------------------------------------------------------------

/// Malformed JSON returns 400 with the English message by default.
#[tokio::test]
async fn test_analyze_invalid_json() {
    let app = common::build_test_app(test_config());
    let response = post_raw(app, "/api/analyze", "{not json", &[]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid JSON");
    assert_eq!(json["code"], "invalid_json");
}

/// With a Spanish Accept-Language header the message localizes.
#[tokio::test]
async fn test_analyze_invalid_json_localized() {
    let app = common::build_test_app(test_config());
    let response = post_raw(
        app,
        "/api/analyze",
        "{not json",
        &[("accept-language", "es-UY,es;q=0.9")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "JSON inválido");
}

/// A body without an image returns 400.
#[tokio::test]
async fn test_analyze_missing_image() {
    let app = common::build_test_app(test_config());
    let response = post_json(app, "/api/analyze", json!({ "occasion": "party" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No image provided");
    assert_eq!(json["code"], "no_image");
}

/// The explicit language field wins over the header.
#[tokio::test]
async fn test_analyze_missing_image_explicit_language() {
    let app = common::build_test_app(test_config());
    let response = post_json(
        app,
        "/api/analyze",
        json!({ "occasion": "party", "language": "es" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No se proporcionó ninguna imagen");
}

/// A decoded payload over the 6 MiB ceiling returns 413 before any
/// provider or storage call.
#[tokio::test]
async fn test_analyze_oversized_image() {
    let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
    let image = format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    );

    let app = common::build_test_app(test_config());
    let response = post_json(app, "/api/analyze", json!({ "image": image })).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Image exceeds 6 MB limit");
}

/// Recommend requires both an image and a text request.
#[tokio::test]
async fn test_recommend_missing_text() {
    let app = common::build_test_app(test_config());
    let response = post_json(app, "/api/recommend", json!({ "image": small_image() })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing image or text");
    assert_eq!(json["code"], "no_request_text");
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// With no storage credentials a valid analyze request gets the
/// storage-configuration error.
#[tokio::test]
async fn test_analyze_missing_storage_config() {
    let app = common::build_test_app(test_config());
    let response = post_json(app, "/api/analyze", json!({ "image": small_image() })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing storage configuration");
    assert_eq!(json["code"], "storage_config");
}

/// With storage configured but no generation key, the API-key error
/// fires, localized.
#[tokio::test]
async fn test_analyze_missing_api_key() {
    let mut config = test_config();
    config.storage = Some(common::unreachable_storage());
    let app = common::build_test_app(config);

    let response = post_json(
        app,
        "/api/analyze",
        json!({ "image": small_image(), "language": "es" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Falta la clave de API");
    assert_eq!(json["code"], "api_key");
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// get-history without a bearer token returns 401.
#[tokio::test]
async fn test_history_requires_auth() {
    let app = common::build_test_app(test_config());
    let response = post_json(app, "/api/get-history", json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "unauthorized");
}

/// delete-scan without a bearer token returns 401.
#[tokio::test]
async fn test_delete_scan_requires_auth() {
    let app = common::build_test_app(test_config());
    let response = post_json(
        app,
        "/api/delete-scan",
        json!({ "id": uuid::Uuid::new_v4() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unauthorized");
}

/// delete-scan with a garbage token returns 401 too.
#[tokio::test]
async fn test_delete_scan_rejects_bad_token() {
    let app = common::build_test_app(test_config());
    let response = post_json_auth(
        app,
        "/api/delete-scan",
        json!({ "id": uuid::Uuid::new_v4() }),
        "not-a-real-token",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A valid token on a quota-checked route reaches the database layer;
/// with the database down the limiter fails closed with a 500, never a
/// quota pass.
#[tokio::test]
async fn test_quota_fails_closed_when_db_down() {
    let mut config = test_config();
    config.storage = Some(common::unreachable_storage());
    config.gemini = Some(common::dummy_gemini());
    let app = common::build_test_app(config);

    let token = common::make_token(uuid::Uuid::new_v4());
    let response = post_json_auth(
        app,
        "/api/analyze",
        json!({ "image": small_image() }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "process_fail");
}

// ---------------------------------------------------------------------------
// Retrieval validation
// ---------------------------------------------------------------------------

/// get-scan with a non-UUID id returns 400.
#[tokio::test]
async fn test_get_scan_rejects_malformed_id() {
    let app = common::build_test_app(test_config());
    let response = get(app, "/api/get-scan?id=not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "invalid_json");
}

/// get-scan with a missing id field in the body returns 400.
#[tokio::test]
async fn test_get_scan_requires_id() {
    let app = common::build_test_app(test_config());
    let response = post_json(app, "/api/get-scan", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
