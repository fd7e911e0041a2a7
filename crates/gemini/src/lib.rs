//! REST client and orchestration for the Gemini generative-model API.
//!
//! [`api`] wraps the HTTP endpoints with typed request/response shapes;
//! [`orchestrator`] layers the deadline race, the search-augmentation
//! fallback, and the restyle image retry on top.

pub mod api;
pub mod orchestrator;

pub use api::{Blob, GeminiApi, GeminiError};
pub use orchestrator::{
    InlineImage, ModelOutput, Orchestrator, PromptPair, DEFAULT_PRIMARY_DEADLINE,
};
