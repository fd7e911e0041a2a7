//! The outfit critique pipeline.
//!
//! `POST /api/analyze` runs the full sequence for one image: decode,
//! quota, concurrent upload + generation, normalization, persistence.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use fitcheck_core::error::CoreError;
use fitcheck_core::image::ImagePayload;
use fitcheck_core::locale::{ErrorCode, Language};
use fitcheck_core::naming::object_key;
use fitcheck_core::normalize::{normalize_critiques, PersonaCritique};
use fitcheck_core::prompt::{critique_prompt, SearchMode};
use fitcheck_core::types::RecordId;
use fitcheck_db::models::scan::CreateScan;
use fitcheck_db::repositories::ScanRepo;
use fitcheck_gemini::{Blob, GeminiError, ModelOutput, Orchestrator, PromptPair};
use fitcheck_storage::StorageClient;

use crate::error::{ApiError, ApiResult};
use crate::middleware::accept_language;
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

/// Occasion assumed when the client sends none.
const DEFAULT_OCCASION: &str = "general";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub image: Option<String>,
    pub language: Option<String>,
    pub occasion: Option<String>,
    pub user_name: Option<String>,
    /// Per-request text-model override; blank or absent means the
    /// configured default.
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub id: RecordId,
    pub image_url: String,
    pub results: Vec<PersonaCritique>,
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    ClientIp(ip_address): ClientIp,
    headers: HeaderMap,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let header_hint = accept_language(&headers);
    let Json(req) = body.map_err(|_| {
        ApiError::localized(ErrorCode::InvalidJson, Language::resolve(None, header_hint))
    })?;
    let lang = Language::resolve(req.language.as_deref(), header_hint);

    let image = req
        .image
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::localized(ErrorCode::NoImage, lang))?;

    let payload = decode_image(image, lang)?;

    let storage = super::require_storage(&state, lang)?;
    let gemini = super::require_gemini(&state, lang)?;

    super::enforce_quota(&state, user, &ip_address, lang).await?;

    let occasion = req
        .occasion
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| DEFAULT_OCCASION.to_string());

    let prompts = PromptPair {
        primary: critique_prompt(&occasion, lang, SearchMode::Augmented),
        fallback: critique_prompt(&occasion, lang, SearchMode::InternalOnly),
    };
    let blob = Blob {
        mime_type: payload.mime_type.clone(),
        data: payload.to_base64(),
    };
    let key = object_key(user.map(|u| u.user_id), &payload.mime_type);

    let (image_url, output) = tokio::try_join!(
        upload_image(storage, &key, &payload, lang),
        run_generation(gemini, &prompts, blob, req.model.as_deref(), lang),
    )?;

    let results = normalize_critiques(&output.text).map_err(|e| {
        tracing::error!(error = %e, "Critique output failed normalization");
        ApiError::localized(ErrorCode::ProcessFail, lang)
    })?;

    let scan = ScanRepo::create(
        &state.pool,
        &CreateScan {
            image_url: image_url.clone(),
            language: lang.as_str().to_string(),
            occasion,
            user_id: user.map(|u| u.user_id),
            user_name: req.user_name,
            ai_results: serde_json::to_value(&results)
                .map_err(|_| ApiError::localized(ErrorCode::ProcessFail, lang))?,
            ip_address,
        },
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        id: scan.id,
        image_url,
        results,
    }))
}

/// Decode the image payload, localizing the two client-fixable failures.
pub(crate) fn decode_image(input: &str, lang: Language) -> ApiResult<ImagePayload> {
    ImagePayload::decode(input).map_err(|e| match e {
        CoreError::PayloadTooLarge { .. } => ApiError::localized(ErrorCode::ImageTooLarge, lang),
        _ => ApiError::localized(ErrorCode::InvalidJson, lang),
    })
}

/// Upload the source image, returning its public URL.
pub(crate) async fn upload_image(
    storage: &StorageClient,
    key: &str,
    payload: &ImagePayload,
    lang: Language,
) -> ApiResult<String> {
    storage
        .upload(key, payload.bytes.clone(), &payload.mime_type)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, key, "Image upload failed");
            ApiError::localized(ErrorCode::StorageFail, lang)
        })
}

/// Run the orchestrated generation, localizing the failure modes.
pub(crate) async fn run_generation(
    gemini: &Orchestrator,
    prompts: &PromptPair,
    image: Blob,
    model: Option<&str>,
    lang: Language,
) -> ApiResult<ModelOutput> {
    gemini.generate(prompts, image, model).await.map_err(|e| {
        tracing::error!(error = %e, "Generation failed");
        let code = match e {
            GeminiError::Empty => ErrorCode::AiEmpty,
            _ => ErrorCode::ProcessFail,
        };
        ApiError::localized(code, lang)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_accepts_model_override() {
        let req: AnalyzeRequest = serde_json::from_value(json!({
            "image": "data:image/jpeg;base64,aW1n",
            "model": "gemini-3-pro-preview"
        }))
        .unwrap();
        assert_eq!(req.model.as_deref(), Some("gemini-3-pro-preview"));

        let req: AnalyzeRequest =
            serde_json::from_value(json!({ "image": "data:image/jpeg;base64,aW1n" })).unwrap();
        assert!(req.model.is_none());
    }
}
