use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use fitcheck_core::locale::{error_message, ErrorCode, Language};

/// Application-level error type for HTTP handlers.
///
/// Almost every failure the client can see is a localized error code;
/// database and other unexpected failures are logged server-side and
/// collapse into the generic processing-failure code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A client-visible error, rendered in the request's language.
    #[error("{code:?}")]
    Localized {
        /// Which error condition.
        code: ErrorCode,
        /// Language the message is rendered in.
        lang: Language,
    },

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// A localized error for the given code.
    pub fn localized(code: ErrorCode, lang: Language) -> Self {
        ApiError::Localized { code, lang }
    }
}

/// HTTP status for each client-visible error code.
fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidJson | ErrorCode::NoImage | ErrorCode::NoRequestText => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::LimitUser | ErrorCode::LimitGuest => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::StorageFail | ErrorCode::AiEmpty => StatusCode::BAD_GATEWAY,
        ErrorCode::StorageConfig
        | ErrorCode::ApiKey
        | ErrorCode::DbUrl
        | ErrorCode::ProcessFail => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, lang) = match self {
            ApiError::Localized { code, lang } => (status_for(code), code, lang),
            ApiError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ProcessFail,
                    Language::En,
                )
            }
        };

        let body = json!({
            "error": error_message(code, lang),
            "code": code.key(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_codes_map_to_429() {
        assert_eq!(status_for(ErrorCode::LimitUser), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_for(ErrorCode::LimitGuest), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn upstream_failures_map_to_502() {
        assert_eq!(status_for(ErrorCode::StorageFail), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorCode::AiEmpty), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn oversized_payload_maps_to_413() {
        assert_eq!(
            status_for(ErrorCode::ImageTooLarge),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
