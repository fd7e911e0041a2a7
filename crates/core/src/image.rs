//! Image payload codec.
//!
//! Decodes the `image` field of inbound requests -- either a
//! `data:<mime>;base64,<payload>` URL or a bare base64 string -- into raw
//! bytes, and enforces the decoded-size ceiling before anything is sent
//! over the network.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;

use crate::error::CoreError;

/// Maximum decoded image size (6 MiB). Bounds cost exposure to the
/// generation call and storage upload.
pub const MAX_IMAGE_BYTES: usize = 6 * 1024 * 1024;

/// Mime type assumed for bare base64 payloads.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

fn data_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:(image/[a-zA-Z+\-.]+);base64,(.+)$").expect("valid data-URL regex")
    })
}

/// A decoded image payload: mime type plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    /// Decode a data-URL or bare base64 string.
    ///
    /// Inputs matching `data:<mime>;base64,<payload>` take their mime type
    /// from the URL; anything else is treated as a bare base64 payload
    /// with a mime type of [`DEFAULT_MIME_TYPE`].
    pub fn decode(input: &str) -> Result<Self, CoreError> {
        let (mime_type, encoded) = match data_url_pattern().captures(input) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str()).unwrap_or(DEFAULT_MIME_TYPE),
                caps.get(2).map(|m| m.as_str()).unwrap_or(""),
            ),
            None => (DEFAULT_MIME_TYPE, input),
        };

        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(CoreError::PayloadTooLarge { size: bytes.len() });
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    /// Build a payload from an already-split mime type and base64 body,
    /// the shape the model API returns inline images in. The size
    /// ceiling applies here too.
    pub fn from_base64(mime_type: &str, encoded: &str) -> Result<Self, CoreError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(CoreError::PayloadTooLarge { size: bytes.len() });
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    /// Re-encode as a `data:` URL for client-facing payloads.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }

    /// Base64 encoding of the raw bytes (the wire format the model API expects).
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// File extension for a mime type: the subtype before any `+` suffix,
/// or `jpg` when the mime type is malformed.
pub fn extension_for(mime_type: &str) -> &str {
    let mut parts = mime_type.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(subtype), None) if !subtype.is_empty() => {
            subtype.split('+').next().unwrap_or("jpg")
        }
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn decodes_data_url() {
        let payload = ImagePayload::decode("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.bytes, b"hello");
    }

    #[test]
    fn decodes_bare_base64_with_default_mime() {
        let payload = ImagePayload::decode("aGVsbG8=").unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.bytes, b"hello");
    }

    #[test]
    fn data_url_round_trip() {
        let original = ImagePayload {
            mime_type: "image/webp".to_string(),
            bytes: vec![0, 1, 2, 250, 251, 252],
        };
        let decoded = ImagePayload::decode(&original.to_data_url()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn from_base64_keeps_given_mime() {
        let payload = ImagePayload::from_base64("image/png", "aGVsbG8=").unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.bytes, b"hello");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_matches!(
            ImagePayload::decode("not base64!!!"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_oversized_payload() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        let input = format!("data:image/jpeg;base64,{}", BASE64.encode(&bytes));
        assert_matches!(
            ImagePayload::decode(&input),
            Err(CoreError::PayloadTooLarge { size }) if size == MAX_IMAGE_BYTES + 1
        );
    }

    #[test]
    fn accepts_payload_at_the_limit() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES];
        let input = format!("data:image/jpeg;base64,{}", BASE64.encode(&bytes));
        assert!(ImagePayload::decode(&input).is_ok());
    }

    #[test]
    fn extension_strips_plus_suffix() {
        assert_eq!(extension_for("image/svg+xml"), "svg");
    }

    #[test]
    fn extension_plain_subtype() {
        assert_eq!(extension_for("image/jpeg"), "jpeg");
        assert_eq!(extension_for("image/png"), "png");
    }

    #[test]
    fn extension_malformed_mime_falls_back() {
        assert_eq!(extension_for("jpeg"), "jpg");
        assert_eq!(extension_for(""), "jpg");
        assert_eq!(extension_for("image/"), "jpg");
        assert_eq!(extension_for("image/png/extra"), "jpg");
    }
}
