//! Blob storage gateway.
//!
//! Attachments live in an external, Supabase-compatible object store and are
//! referenced by opaque paths. Reads hand out short-lived signed URLs; a
//! failed signing attempt is logged and surfaces as `None`, never as an
//! error on a read path.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::{Config, SIGNED_URL_TTL_SECONDS};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// A file received from a client, buffered in memory for upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Consumed blob storage capability.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Upload content under a freshly generated unique name preserving the
    /// original extension. Returns the opaque storage path.
    async fn upload(&self, file: &UploadedFile) -> AppResult<String>;

    /// Resolve a time-limited signed URL for a stored path.
    ///
    /// Transient failures are logged and collapse to `None`.
    async fn signed_url(&self, path: &str) -> Option<String>;

    /// Remove a stored object. Failures are logged and reported as `false`.
    async fn delete(&self, path: &str) -> bool;
}

/// Supabase storage REST client.
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            api_key: config.storage_key().to_string(),
            bucket: config.storage_bucket.clone(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    /// Generate a unique object name, keeping the original extension so
    /// downloads open with the right handler.
    fn unique_name(filename: &str) -> String {
        match filename.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => format!("{}.{}", Uuid::new_v4(), ext),
            _ => Uuid::new_v4().to_string(),
        }
    }
}

#[async_trait]
impl BlobStorage for SupabaseStorage {
    async fn upload(&self, file: &UploadedFile) -> AppResult<String> {
        let path = Self::unique_name(&file.filename);
        let content_type = file
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let response = self
            .client
            .post(self.object_url(&path))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| AppError::storage(format!("upload of '{}' failed: {}", file.filename, e)))?;

        if !response.status().is_success() {
            return Err(AppError::storage(format!(
                "upload of '{}' rejected with status {}",
                file.filename,
                response.status()
            )));
        }

        Ok(path)
    }

    async fn signed_url(&self, path: &str) -> Option<String> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.base_url, self.bucket, path
        );

        let result = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "expiresIn": SIGNED_URL_TTL_SECONDS }))
            .send()
            .await;

        let response = match result {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!(path, status = %r.status(), "Failed to sign attachment URL");
                return None;
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Failed to sign attachment URL");
                return None;
            }
        };

        match response.json::<SignedUrlResponse>().await {
            Ok(body) => {
                // The API returns a path relative to the storage host
                if body.signed_url.starts_with('/') {
                    Some(format!("{}/storage/v1{}", self.base_url, body.signed_url))
                } else {
                    Some(body.signed_url)
                }
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Unexpected signing response");
                None
            }
        }
    }

    async fn delete(&self, path: &str) -> bool {
        let result = self
            .client
            .delete(self.object_url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await;

        match result {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                tracing::warn!(path, status = %r.status(), "Failed to delete blob");
                false
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Failed to delete blob");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_preserves_extension() {
        let name = SupabaseStorage::unique_name("report.pdf");
        assert!(name.ends_with(".pdf"));
        assert_ne!(name, "report.pdf");
    }

    #[test]
    fn test_unique_name_without_extension() {
        let name = SupabaseStorage::unique_name("README");
        assert!(!name.contains('.'));
        assert!(Uuid::parse_str(&name).is_ok());
    }

    #[test]
    fn test_unique_names_never_collide() {
        let a = SupabaseStorage::unique_name("a.png");
        let b = SupabaseStorage::unique_name("a.png");
        assert_ne!(a, b);
    }
}
