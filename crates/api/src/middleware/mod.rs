//! Request extractors shared across handlers.

pub mod auth;
pub mod client_ip;

use axum::http::HeaderMap;

/// The raw `Accept-Language` header value, if any.
pub fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
}
