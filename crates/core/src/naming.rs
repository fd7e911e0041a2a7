//! Object-key naming for uploaded images.
//!
//! Keys are collision-resistant (timestamp + random UUID) and namespaced
//! by owner so tenants never collide and per-tenant cleanup stays a
//! prefix operation.

use uuid::Uuid;

use crate::image::extension_for;
use crate::types::RecordId;

/// Namespace segment for unauthenticated uploads.
pub const GUEST_NAMESPACE: &str = "guest";

/// Generate an object key: `<userId|"guest">/<timestamp_ms>-<uuid>.<ext>`.
pub fn object_key(owner: Option<RecordId>, mime_type: &str) -> String {
    let namespace = owner
        .map(|id| id.to_string())
        .unwrap_or_else(|| GUEST_NAMESPACE.to_string());
    format!(
        "{namespace}/{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        extension_for(mime_type),
    )
}
