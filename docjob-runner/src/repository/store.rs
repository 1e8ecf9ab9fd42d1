//! Content store repository
//!
//! Key-addressed reads of result artifacts. How paths are built is the
//! caller's concern; the store only resolves them.

use async_trait::async_trait;
use bytes::Bytes;
use docjob_client::{ClientError, ObjectStorageClient, Result};
use docjob_core::ArtifactPath;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Repository trait for the content store
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Reads the object at `path`
    ///
    /// Returns `ClientError::NotFound` when nothing is stored there.
    async fn get(&self, path: &ArtifactPath) -> Result<Bytes>;
}

/// HTTP implementation of ContentStore
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    client: ObjectStorageClient,
}

impl HttpContentStore {
    pub fn new(client: ObjectStorageClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn get(&self, path: &ArtifactPath) -> Result<Bytes> {
        self.client.get_object(path).await
    }
}

/// In-memory implementation of ContentStore
///
/// Uses Arc<Mutex<HashMap>> so clones share the same objects.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentStore {
    objects: Arc<Mutex<HashMap<ArtifactPath, Bytes>>>,
    reads: Arc<Mutex<Vec<ArtifactPath>>>,
}

impl InMemoryContentStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` at `path`, replacing any previous object
    pub fn put(&self, path: ArtifactPath, content: impl Into<Bytes>) {
        let mut objects = self.objects.lock().unwrap();
        objects.insert(path, content.into());
    }

    /// Every path passed to `get`, in call order
    pub fn reads(&self) -> Vec<ArtifactPath> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get(&self, path: &ArtifactPath) -> Result<Bytes> {
        self.reads.lock().unwrap().push(path.clone());
        let objects = self.objects.lock().unwrap();
        objects
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryContentStore::new();
        let path = ArtifactPath::new("ns", "b", "out/j/_/results/doc.json");
        store.put(path.clone(), Bytes::from_static(b"{}"));

        assert_eq!(store.get(&path).await.unwrap(), Bytes::from_static(b"{}"));

        let missing = ArtifactPath::new("ns", "b", "nope.json");
        let err = store.get(&missing).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.reads(), vec![path, missing]);
    }
}
