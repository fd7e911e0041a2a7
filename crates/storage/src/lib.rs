//! HTTP client for the object-storage service.
//!
//! Uploads outfit images into a public bucket over the storage REST API
//! and resolves/parses the public URLs persisted alongside each record.
//! Deletes are best-effort by design: a blob that refuses to die never
//! blocks removal of the database row.

use std::time::Duration;

use fitcheck_core::deadline::{with_deadline, DeadlineExceeded};

/// Default bucket for outfit images.
pub const DEFAULT_BUCKET: &str = "outfits";

/// Deadline for a single upload.
pub const UPLOAD_DEADLINE: Duration = Duration::from_secs(20);

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage service returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for server-side logging.
        body: String,
    },

    /// The upload exceeded its deadline.
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

/// Client for one storage deployment + bucket.
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl StorageClient {
    /// Create a client for a storage deployment.
    ///
    /// * `base_url` - deployment root, e.g. `https://abc.supabase.co`.
    /// * `service_key` - service-role key sent as a bearer token.
    /// * `bucket` - target bucket name.
    pub fn new(base_url: String, service_key: String, bucket: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    /// Public download URL for an object key.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }

    /// Recover the object key from a persisted public URL.
    ///
    /// Returns `None` when the URL does not point into this bucket;
    /// callers log and move on (the row still gets deleted).
    pub fn key_from_public_url(&self, url: &str) -> Option<String> {
        let marker = format!("/public/{}/", self.bucket);
        let index = url.find(&marker)?;
        let key = &url[index + marker.len()..];
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    /// Upload raw bytes under an object key, returning the public URL.
    ///
    /// Bounded by [`UPLOAD_DEADLINE`]; an upload that exceeds it is a
    /// failure, not a hang.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<String, StorageError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key);

        let response = with_deadline(
            UPLOAD_DEADLINE,
            self.client
                .post(&url)
                .bearer_auth(&self.service_key)
                .header(reqwest::header::CONTENT_TYPE, mime_type)
                .body(bytes)
                .send(),
        )
        .await??;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(key, bucket = %self.bucket, "Uploaded object");
        Ok(self.public_url(key))
    }

    /// Delete objects by key. Used on record deletion; failures are the
    /// caller's to log, not to propagate.
    pub async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.service_key)
            .json(&serde_json::json!({ "prefixes": keys }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::new(
            "https://example.supabase.co/".to_string(),
            "service-key".to_string(),
            DEFAULT_BUCKET.to_string(),
        )
    }

    #[test]
    fn public_url_shape() {
        assert_eq!(
            client().public_url("guest/123-abc.jpg"),
            "https://example.supabase.co/storage/v1/object/public/outfits/guest/123-abc.jpg"
        );
    }

    #[test]
    fn key_round_trips_through_public_url() {
        let client = client();
        let key = "guest/1700000000-d00d.png";
        assert_eq!(
            client.key_from_public_url(&client.public_url(key)).as_deref(),
            Some(key)
        );
    }

    #[test]
    fn foreign_urls_produce_no_key() {
        let client = client();
        assert_eq!(client.key_from_public_url("https://elsewhere.example/img.png"), None);
        assert_eq!(
            client.key_from_public_url("https://example.supabase.co/storage/v1/object/public/other-bucket/a.png"),
            None
        );
        assert_eq!(
            client.key_from_public_url("https://example.supabase.co/storage/v1/object/public/outfits/"),
            None
        );
    }
}
