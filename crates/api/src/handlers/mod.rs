//! Request handlers.

pub mod analyze;
pub mod history;
pub mod recommend;
pub mod scan;

use fitcheck_core::locale::{ErrorCode, Language};
use fitcheck_core::quota::{Tier, WINDOW_HOURS};
use fitcheck_db::repositories::usage_repo::UsageRepo;
use fitcheck_gemini::Orchestrator;
use fitcheck_storage::StorageClient;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The generation orchestrator, or a localized configuration error.
pub(crate) fn require_gemini(state: &AppState, lang: Language) -> ApiResult<&Orchestrator> {
    state
        .gemini
        .as_deref()
        .ok_or_else(|| ApiError::localized(ErrorCode::ApiKey, lang))
}

/// The storage client, or a localized configuration error.
pub(crate) fn require_storage(state: &AppState, lang: Language) -> ApiResult<&StorageClient> {
    state
        .storage
        .as_deref()
        .ok_or_else(|| ApiError::localized(ErrorCode::StorageConfig, lang))
}

/// Deny the request once the identity's trailing-window usage hits its
/// tier limit.
///
/// A failed counting query denies too: a broken limiter must never read
/// as "quota not exceeded".
pub(crate) async fn enforce_quota(
    state: &AppState,
    user: Option<AuthUser>,
    ip_address: &str,
    lang: Language,
) -> ApiResult<()> {
    let since = chrono::Utc::now() - chrono::Duration::hours(WINDOW_HOURS);

    let count = UsageRepo::count_since(&state.pool, user.map(|u| u.user_id), ip_address, since)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Usage count failed, denying request");
            ApiError::localized(ErrorCode::ProcessFail, lang)
        })?;

    let tier = match user {
        Some(_) => Tier::Authenticated,
        None => Tier::Guest,
    };

    state.config.quota.check(tier, count).map_err(|_| {
        tracing::info!(%ip_address, ?tier, count, "Quota exceeded");
        let code = match tier {
            Tier::Authenticated => ErrorCode::LimitUser,
            Tier::Guest => ErrorCode::LimitGuest,
        };
        ApiError::localized(code, lang)
    })
}
