use fitcheck_core::quota::{QuotaPolicy, DEFAULT_GUEST_LIMIT, DEFAULT_USER_LIMIT};

use crate::auth::JwtConfig;

/// Generation provider credentials and model selection.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// API key sent on every request.
    pub api_key: String,
    /// Model used for critique/restyle text generation.
    pub text_model: String,
    /// Model used for restyle image generation.
    pub image_model: String,
}

/// Object-storage deployment credentials.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Deployment root URL.
    pub url: String,
    /// Service-role key sent as a bearer token.
    pub service_key: String,
    /// Bucket for outfit images.
    pub bucket: String,
}

/// Server configuration loaded from environment variables.
///
/// Provider credentials are optional at boot: a missing block disables
/// the routes that need it with a localized 500, instead of refusing to
/// start. Only `DATABASE_URL` is required up front (checked in `main`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT validation secret, when accounts are enabled.
    pub jwt: JwtConfig,
    /// Generation provider, when configured.
    pub gemini: Option<GeminiSettings>,
    /// Object storage, when configured.
    pub storage: Option<StorageSettings>,
    /// Daily request quotas.
    pub quota: QuotaPolicy,
}

/// Default text-generation model.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
/// Default image-generation model.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                   |
    /// |-----------------------------|---------------------------|
    /// | `HOST`                      | `0.0.0.0`                 |
    /// | `PORT`                      | `3000`                    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                      |
    /// | `JWT_SECRET`                | unset (auth disabled)     |
    /// | `GEMINI_API_KEY`            | unset (generation 500s)   |
    /// | `GEMINI_TEXT_MODEL`         | `gemini-3-flash-preview`  |
    /// | `GEMINI_IMAGE_MODEL`        | `gemini-2.5-flash-image`  |
    /// | `SUPABASE_URL`              | unset (storage 500s)      |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | unset (storage 500s)      |
    /// | `SUPABASE_BUCKET`           | `outfits`                 |
    /// | `USER_DAILY_LIMIT`          | `50`                      |
    /// | `GUEST_DAILY_LIMIT`         | `3`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let gemini = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(|api_key| GeminiSettings {
                api_key,
                text_model: std::env::var("GEMINI_TEXT_MODEL")
                    .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.into()),
                image_model: std::env::var("GEMINI_IMAGE_MODEL")
                    .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.into()),
            });

        let storage = match (
            std::env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty()),
            std::env::var("SUPABASE_SERVICE_ROLE_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
        ) {
            (Some(url), Some(service_key)) => Some(StorageSettings {
                url,
                service_key,
                bucket: std::env::var("SUPABASE_BUCKET")
                    .unwrap_or_else(|_| fitcheck_storage::DEFAULT_BUCKET.into()),
            }),
            _ => None,
        };

        let user_limit: i64 = std::env::var("USER_DAILY_LIMIT")
            .unwrap_or_else(|_| DEFAULT_USER_LIMIT.to_string())
            .parse()
            .expect("USER_DAILY_LIMIT must be a valid i64");

        let guest_limit: i64 = std::env::var("GUEST_DAILY_LIMIT")
            .unwrap_or_else(|_| DEFAULT_GUEST_LIMIT.to_string())
            .parse()
            .expect("GUEST_DAILY_LIMIT must be a valid i64");

        Self {
            host,
            port,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            gemini,
            storage,
            quota: QuotaPolicy {
                user_limit,
                guest_limit,
            },
        }
    }
}
