//! Bearer-token authentication extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use fitcheck_core::locale::{ErrorCode, Language};
use fitcheck_core::types::RecordId;

use crate::auth::validate_token;
use crate::error::ApiError;
use crate::middleware::accept_language;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication; rejections are localized 401s.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: RecordId,
}

/// Identity for routes where authentication is optional: a valid token
/// yields the user, anything else (including no token at all) yields a
/// guest. Never rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let lang = Language::resolve(None, accept_language(&parts.headers));
        let unauthorized = || ApiError::localized(ErrorCode::Unauthorized, lang);

        let token = bearer_token(parts).ok_or_else(unauthorized)?;

        let secret = state.config.jwt.secret.as_deref().ok_or_else(|| {
            tracing::warn!("Bearer token presented but JWT_SECRET is not configured");
            unauthorized()
        })?;

        let claims = validate_token(token, secret).map_err(|_| unauthorized())?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
