//! Object storage for user avatars.

pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::AppError;

pub use s3::S3Storage;

/// A bucket that accepts public objects.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug {
    /// Uploads `body` under `key` and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the upload fails.
    async fn put_object(&self, key: &str, content_type: &str, body: Bytes)
    -> Result<String, AppError>;
}

/// Builds the object key for a user's avatar: `{uuid}-{filename}` with the
/// filename reduced to `[A-Za-z0-9._-]`.
#[must_use]
pub fn avatar_key(owner: Uuid, filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        format!("{owner}-avatar")
    } else {
        format!("{owner}-{cleaned}")
    }
}
