//! The restyle pipeline.
//!
//! `POST /api/recommend` takes an outfit image plus a free-text request
//! and returns a structured restyle plan, with a generated visualization
//! when the image model cooperates. The visualization is best-effort:
//! its absence never fails an otherwise good result.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use fitcheck_core::image::ImagePayload;
use fitcheck_core::locale::{ErrorCode, Language};
use fitcheck_core::naming::object_key;
use fitcheck_core::normalize::{normalize_style, StyleResult};
use fitcheck_core::prompt::{restyle_prompt, SearchMode};
use fitcheck_core::types::RecordId;
use fitcheck_db::models::style::CreateStyle;
use fitcheck_db::repositories::StyleRepo;
use fitcheck_gemini::{Blob, PromptPair};
use fitcheck_storage::StorageClient;

use super::analyze::{decode_image, run_generation, upload_image};
use crate::error::{ApiError, ApiResult};
use crate::middleware::accept_language;
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub image: Option<String>,
    pub text: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub id: RecordId,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,
    #[serde(flatten)]
    pub result: StyleResult,
}

/// POST /api/recommend
pub async fn recommend(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    ClientIp(ip_address): ClientIp,
    headers: HeaderMap,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendResponse>> {
    let header_hint = accept_language(&headers);
    let Json(req) = body.map_err(|_| {
        ApiError::localized(ErrorCode::InvalidJson, Language::resolve(None, header_hint))
    })?;
    let lang = Language::resolve(req.language.as_deref(), header_hint);

    let (image, text) = match (
        req.image.as_deref().filter(|s| !s.is_empty()),
        req.text.as_deref().filter(|s| !s.is_empty()),
    ) {
        (Some(image), Some(text)) => (image, text),
        _ => return Err(ApiError::localized(ErrorCode::NoRequestText, lang)),
    };

    let payload = decode_image(image, lang)?;

    let storage = super::require_storage(&state, lang)?;
    let gemini = super::require_gemini(&state, lang)?;

    super::enforce_quota(&state, user, &ip_address, lang).await?;

    let prompts = PromptPair {
        primary: restyle_prompt(text, lang, SearchMode::Augmented),
        fallback: restyle_prompt(text, lang, SearchMode::InternalOnly),
    };
    let blob = Blob {
        mime_type: payload.mime_type.clone(),
        data: payload.to_base64(),
    };
    let key = object_key(user.map(|u| u.user_id), &payload.mime_type);

    let (image_url, output) = tokio::try_join!(
        upload_image(storage, &key, &payload, lang),
        run_generation(gemini, &prompts, blob.clone(), None, lang),
    )?;

    let mut style = normalize_style(&output.text).map_err(|e| {
        tracing::error!(error = %e, "Restyle output failed normalization");
        ApiError::localized(ErrorCode::ProcessFail, lang)
    })?;

    // The visualization usually arrives inline with the text; when it
    // does not, one image-only retry reuses the parsed visual prompt.
    let inline = match output.inline_image {
        Some(blob_out) => Some(blob_out),
        None if !style.visual_prompt.is_empty() => gemini
            .generate_image(&style.visual_prompt, blob)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Visualization retry failed");
                None
            }),
        None => None,
    };

    let generated_image_url =
        store_generated_image(storage, user.map(|u| u.user_id), inline, &mut style).await;

    let record = StyleRepo::create(
        &state.pool,
        &CreateStyle {
            user_id: user.map(|u| u.user_id),
            image_url: image_url.clone(),
            generated_image_url: generated_image_url.clone(),
            request_text: text.to_string(),
            language: lang.as_str().to_string(),
            result: serde_json::to_value(&style)
                .map_err(|_| ApiError::localized(ErrorCode::ProcessFail, lang))?,
            ip_address,
        },
    )
    .await?;

    Ok(Json(RecommendResponse {
        id: record.id,
        image_url,
        generated_image_url,
        result: style,
    }))
}

/// Decode, upload, and data-URL the generated visualization.
///
/// Any failure here degrades to "no visualization": logged, never
/// propagated.
async fn store_generated_image(
    storage: &StorageClient,
    owner: Option<RecordId>,
    inline: Option<Blob>,
    style: &mut StyleResult,
) -> Option<String> {
    let blob = inline?;
    let generated = match ImagePayload::from_base64(&blob.mime_type, &blob.data) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Generated image payload unusable");
            return None;
        }
    };

    style.generated_image_data_url = Some(generated.to_data_url());

    let key = object_key(owner, &generated.mime_type);
    match storage
        .upload(&key, generated.bytes.clone(), &generated.mime_type)
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(error = %e, key, "Generated image upload failed");
            None
        }
    }
}
