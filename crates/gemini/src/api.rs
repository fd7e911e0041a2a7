//! REST API client for the Gemini `generateContent` endpoint.
//!
//! Wraps the provider HTTP API using [`reqwest`] with typed request and
//! response shapes. The response side is deliberately loose -- every
//! field optional -- because the provider's part layout varies between
//! text-only, tool-augmented, and image-bearing responses.

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Per-request HTTP timeout on the underlying client. The orchestrator
/// applies tighter per-call deadlines on top of this backstop.
const CLIENT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// HTTP client for the generative-model API.
pub struct GeminiApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Errors from the generative-model API layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for server-side logging.
        body: String,
    },

    /// The provider answered but produced no usable text.
    #[error("Empty response from model")]
    Empty,

    /// The primary call exceeded its deadline.
    #[error(transparent)]
    Deadline(#[from] fitcheck_core::deadline::DeadlineExceeded),
}

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Inline binary data (an image) as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// One part of a content block: text, inline data, or (in responses)
/// something we don't model and skip over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(blob: Blob) -> Self {
        Part {
            text: None,
            inline_data: Some(blob),
        }
    }
}

/// A content block: an ordered list of parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Tool declaration. Only the web-search tool is used.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

/// Empty marker object enabling search grounding.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

/// Generation tuning knobs.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One candidate completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Response of a `generateContent` call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl GeminiApi {
    /// Create a new API client against the default base URL.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against an explicit base URL (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Issue a `generateContent` call against a model.
    ///
    /// The API key travels in the `x-goog-api-key` header, never in the
    /// URL, so request logs stay free of credentials.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case_inline_data() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text("describe this"),
                    Part::inline(Blob {
                        mime_type: "image/png".into(),
                        data: "aGVsbG8=".into(),
                    }),
                ],
            }],
            tools: None,
            generation_config: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "describe this");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn search_tool_serializes_as_empty_object() {
        let request = GenerateRequest {
            contents: vec![],
            tools: Some(vec![Tool {
                google_search: GoogleSearch::default(),
            }]),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
                max_output_tokens: Some(1000),
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tools"][0]["google_search"], serde_json::json!({}));
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());

        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hi"}, {"thought": true}]}}]}"#,
        )
        .unwrap();
        let parts = &parsed.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("hi"));
        assert!(parts[1].text.is_none());
    }
}
