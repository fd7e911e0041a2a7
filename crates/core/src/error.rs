use crate::image::MAX_IMAGE_BYTES;
use crate::quota::Tier;

/// Domain-level error type shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Image payload of {size} bytes exceeds the {MAX_IMAGE_BYTES}-byte limit")]
    PayloadTooLarge { size: usize },

    #[error("Request quota exceeded for {0:?} tier")]
    QuotaExceeded(Tier),

    /// The model returned text that could not be parsed into the
    /// expected shape after every rescue attempt.
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),
}
