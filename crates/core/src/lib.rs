//! Outfit Check domain logic.
//!
//! Pure building blocks shared by the API server: image payload decoding,
//! locale resolution, persona and prompt construction, model-output
//! normalization, quota policy, object-key naming, and the deadline
//! combinator used to bound every external call.

pub mod deadline;
pub mod error;
pub mod image;
pub mod locale;
pub mod naming;
pub mod normalize;
pub mod persona;
pub mod prompt;
pub mod quota;
pub mod types;
