//! In-memory storage backend (for testing)

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::traits::{PayloadStore, StoredObject};

/// In-memory store for tests and the `memory` backend
///
/// Thread-safe via `RwLock`. Not persistent; data is lost on drop.
#[derive(Default)]
pub struct InMemoryStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.read().keys().cloned().collect();
        paths.sort();
        paths
    }

    // Poisoning is ignored: every write is a single insert or remove.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<u8>>> {
        self.objects.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<u8>>> {
        self.objects.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PayloadStore for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, path: &str, data: &[u8]) -> StorageResult<StoredObject> {
        self.write().insert(path.to_string(), data.to_vec());
        Ok(StoredObject {
            backend: self.name().to_string(),
            path: path.to_string(),
            size: data.len() as u64,
        })
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.read()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.write().remove(path);
        Ok(())
    }
}
