//! Generation orchestration: deadline race, fallback, image retry.
//!
//! The primary attempt runs search-augmented and is raced against a
//! fixed deadline; on timeout, error, or empty text a single fallback
//! call runs with tools disabled and the internal-knowledge prompt
//! variant, bounded only by the client's own backstop timeout. Both
//! failing collapses into one opaque error for the caller.

use std::time::Duration;

use fitcheck_core::deadline::with_deadline;

use crate::api::{
    Blob, Content, GeminiApi, GenerateRequest, GenerateResponse, GeminiError, GenerationConfig,
    GoogleSearch, Part, Tool,
};

/// Default deadline for the search-augmented primary attempt.
pub const DEFAULT_PRIMARY_DEADLINE: Duration = Duration::from_secs(15);

/// Inline image returned by the model (base64 payload).
pub type InlineImage = Blob;

/// The primary (search-augmented) and fallback (internal-only) prompt
/// variants for one generation.
#[derive(Debug, Clone)]
pub struct PromptPair {
    pub primary: String,
    pub fallback: String,
}

/// Extracted model output: concatenated text plus any inline image.
#[derive(Debug, Clone, Default)]
pub struct ModelOutput {
    pub text: String,
    pub inline_image: Option<InlineImage>,
}

/// Drives generation calls against the model API.
pub struct Orchestrator {
    api: GeminiApi,
    text_model: String,
    image_model: String,
    primary_deadline: Duration,
}

impl Orchestrator {
    pub fn new(
        api: GeminiApi,
        text_model: String,
        image_model: String,
        primary_deadline: Duration,
    ) -> Self {
        Self {
            api,
            text_model,
            image_model,
            primary_deadline,
        }
    }

    /// Pick the text model for one request: a non-blank per-request
    /// override wins, otherwise the configured default.
    fn text_model_for<'a>(&'a self, override_model: Option<&'a str>) -> &'a str {
        override_model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.text_model)
    }

    /// Run the primary search-augmented attempt, falling back once to a
    /// deterministic tools-off call when it times out, errors, or comes
    /// back without text. Both attempts use the same model, which the
    /// caller may override per request.
    pub async fn generate(
        &self,
        prompts: &PromptPair,
        image: Blob,
        override_model: Option<&str>,
    ) -> Result<ModelOutput, GeminiError> {
        let model = self.text_model_for(override_model);
        let primary_request = build_request(&prompts.primary, image.clone(), true);
        let primary = with_deadline(
            self.primary_deadline,
            self.api.generate_content(model, &primary_request),
        )
        .await;

        match primary {
            Ok(Ok(response)) => {
                let output = extract_output(&response);
                if !output.text.is_empty() {
                    return Ok(output);
                }
                tracing::warn!(model, "Primary generation returned no text, falling back");
            }
            Ok(Err(e)) => {
                tracing::warn!(model, error = %e, "Primary generation failed, falling back");
            }
            Err(elapsed) => {
                tracing::warn!(model, error = %elapsed, "Primary generation timed out, falling back");
            }
        }

        // Fallback: tools off, internal-knowledge prompt, no extra race.
        let fallback_request = build_request(&prompts.fallback, image, false);
        let response = self.api.generate_content(model, &fallback_request).await?;
        let output = extract_output(&response);
        if output.text.is_empty() {
            return Err(GeminiError::Empty);
        }
        Ok(output)
    }

    /// Narrowly-scoped image-only call for the restyle flow, reusing the
    /// already-derived visual description so the retry is cheap.
    pub async fn generate_image(
        &self,
        visual_prompt: &str,
        image: Blob,
    ) -> Result<Option<InlineImage>, GeminiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text(format!("Photoreal fashion shot: {visual_prompt}")),
                    Part::inline(image),
                ],
            }],
            tools: None,
            generation_config: None,
        };
        let response = self
            .api
            .generate_content(&self.image_model, &request)
            .await?;
        Ok(extract_output(&response).inline_image)
    }
}

/// Assemble a `generateContent` body.
///
/// With search enabled the response mime type is left unset (the
/// provider rejects strict-JSON mode alongside tools); without it the
/// model is pinned to `application/json`.
fn build_request(prompt: &str, image: Blob, with_search: bool) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part::text(prompt), Part::inline(image)],
        }],
        tools: with_search.then(|| {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        }),
        generation_config: (!with_search).then(|| GenerationConfig {
            response_mime_type: Some("application/json".into()),
            max_output_tokens: None,
        }),
    }
}

/// Walk the heterogeneous candidate/part layout: concatenate the first
/// candidate's text parts, take the first inline image anywhere.
pub fn extract_output(response: &GenerateResponse) -> ModelOutput {
    let mut output = ModelOutput::default();

    if let Some(content) = response.candidates.first().and_then(|c| c.content.as_ref()) {
        for part in &content.parts {
            if let Some(text) = &part.text {
                output.text.push_str(text);
            }
        }
    }

    output.inline_image = response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.clone());

    output
}
