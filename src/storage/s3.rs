//! S3-compatible backend (works against the GCS interoperability endpoint).

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::ObjectStorage;
use crate::config::StorageConfig;
use crate::error::AppError;

/// Uploads objects with `aws-sdk-s3` using path-style addressing.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Builds a client from the storage configuration.
    ///
    /// Static credentials are used when both key parts are configured;
    /// otherwise the default provider chain applies.
    pub async fn connect(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id, secret, None, None, "userhub",
            ));
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config).force_path_style(true);
        if !config.endpoint.trim().is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket_name.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{key}", self.public_base_url, self.bucket)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key, error = %e, "object upload failed");
                AppError::Storage(e.to_string())
            })?;

        tracing::info!(bucket = %self.bucket, key, "object uploaded");
        Ok(self.public_url(key))
    }
}
