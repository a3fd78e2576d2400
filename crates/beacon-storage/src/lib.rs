//! Blob storage access for per-tenant push credentials.
//!
//! Credentials (APNS p8 signing keys, FCM service-account documents) live
//! in remote blob storage under keys of the form `"<backend>/<tenant>.<ext>"`.
//! The [`BlobStore`] trait is the seam: production uses [`S3BlobStore`],
//! tests use [`MemoryBlobStore`]. No caching happens at this layer — the
//! client pools above it decide when a credential is fetched.

mod error;
mod memory;
mod s3;

use async_trait::async_trait;

pub use error::StorageError;
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

/// Remote blob storage keyed by string paths.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a blob's full contents.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] for a missing key and
    /// [`StorageError::Unavailable`] for transport failures.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Store a blob, replacing any existing contents.
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StorageError>;

    /// Delete a blob. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
