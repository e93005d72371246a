//! # In-Memory Blob Store
//!
//! Keeps blobs in a map. Used by tests and by local runs without a storage
//! account.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::BlobResult;
use crate::store::BlobStore;

/// A stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob store backed by a shared `HashMap`. Clones share the same blobs.
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    container: String,
    blobs: Arc<RwLock<HashMap<String, StoredBlob>>>,
}

impl MemoryBlobStore {
    pub fn new(container: impl Into<String>) -> Self {
        MemoryBlobStore {
            container: container.into(),
            blobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    fn url_for(&self, key: &str) -> String {
        format!("memory://{}/{}", self.container, key)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> BlobResult<String> {
        debug!(key = %key, size = bytes.len(), "Storing blob in memory");

        self.blobs.write().await.insert(
            key.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );

        Ok(self.url_for(key))
    }

    fn container(&self) -> &str {
        &self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryBlobStore::new("c");

        store.put("k.png", vec![1], "image/png").await.unwrap();
        let url = store.put("k.png", vec![2, 2], "image/png").await.unwrap();

        assert_eq!(url, "memory://c/k.png");
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("k.png").await.unwrap().bytes, vec![2, 2]);
    }

    #[tokio::test]
    async fn test_clones_share_blobs() {
        let store = MemoryBlobStore::new("c");
        let clone = store.clone();

        clone.put("a", vec![0], "application/octet-stream").await.unwrap();

        assert!(store.get("a").await.is_some());
    }
}
