//! Amazon S3 blob store.
//!
//! Uses the official AWS SDK with IAM role or ambient credential
//! authentication. Every operation carries a 30-second bound via the SDK's
//! timeout configuration.

use crate::{BlobStore, StorageError};
use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::time::Duration;

/// Bound on any single S3 operation.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// [`BlobStore`] backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    /// Create a store over a bucket, loading AWS configuration from the
    /// environment (region, credentials, endpoint overrides).
    pub async fn new(bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(OPERATION_TIMEOUT)
            .build();
        let sdk_config = aws_config::from_env().timeout_config(timeouts).load().await;
        let client = aws_sdk_s3::Client::new(&sdk_config);

        tracing::info!(bucket = %bucket, "S3 blob store initialized");
        Self { client, bucket }
    }

    /// The bucket this store operates on.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Unavailable {
                        detail: format!("get {key}: {service_err}"),
                    }
                }
            })?;

        let data = result
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Unavailable {
                detail: format!("read body of {key}: {e}"),
            })?
            .into_bytes()
            .to_vec();

        tracing::debug!(key, bytes = data.len(), "Blob fetched from S3");
        Ok(data)
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Unavailable {
                detail: format!("put {key}: {}", e.into_service_error()),
            })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Unavailable {
                detail: format!("delete {key}: {}", e.into_service_error()),
            })?;
        Ok(())
    }
}
