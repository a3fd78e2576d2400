//! In-memory blob store for tests and local development.

use crate::{BlobStore, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// [`BlobStore`] backed by a process-local map.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Check whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StorageError> {
        self.blobs.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryBlobStore::new();
        store.put("fcm/acme.json", b"{}".to_vec()).await.unwrap();
        assert_eq!(store.get("fcm/acme.json").await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryBlobStore::new();
        let err = store.get("apns/ghost.p8").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryBlobStore::new();
        store.put("apns/acme.p8", vec![1, 2, 3]).await.unwrap();
        store.delete("apns/acme.p8").await.unwrap();
        store.delete("apns/acme.p8").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = MemoryBlobStore::new();
        store.put("k", vec![1]).await.unwrap();
        store.put("k", vec![2]).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), vec![2]);
        assert_eq!(store.len().await, 1);
    }
}
