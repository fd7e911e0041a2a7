use std::sync::Arc;

use fitcheck_gemini::{GeminiApi, Orchestrator, DEFAULT_PRIMARY_DEADLINE};
use fitcheck_storage::StorageClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The provider
/// clients are `None` when the matching credentials were not configured;
/// handlers that need them answer with a localized configuration error.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fitcheck_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Generation orchestrator, when the provider is configured.
    pub gemini: Option<Arc<Orchestrator>>,
    /// Object-storage client, when configured.
    pub storage: Option<Arc<StorageClient>>,
}

impl AppState {
    /// Build state from a pool and config, constructing the provider
    /// clients from whatever credentials are present.
    pub fn new(pool: fitcheck_db::DbPool, config: ServerConfig) -> Self {
        let gemini = config.gemini.as_ref().map(|settings| {
            Arc::new(Orchestrator::new(
                GeminiApi::new(settings.api_key.clone()),
                settings.text_model.clone(),
                settings.image_model.clone(),
                DEFAULT_PRIMARY_DEADLINE,
            ))
        });

        let storage = config.storage.as_ref().map(|settings| {
            Arc::new(StorageClient::new(
                settings.url.clone(),
                settings.service_key.clone(),
                settings.bucket.clone(),
            ))
        });

        Self {
            pool,
            config: Arc::new(config),
            gemini,
            storage,
        }
    }
}
