//! Storage trait definitions

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{StorageError, StorageResult};

/// Receipt for a stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub backend: String,
    /// Path as reported by the backend
    #[serde(rename = "stored_path")]
    pub path: String,
    pub size: u64,
}

/// Path-addressed object storage for encrypted artifacts
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Short backend name used in logs and reports
    fn name(&self) -> &'static str;

    /// Store `data` at `path`, overwriting any existing object
    async fn put(&self, path: &str, data: &[u8]) -> StorageResult<StoredObject>;

    /// Retrieve an object
    ///
    /// Returns `StorageError::NotFound` if nothing is stored at `path`.
    async fn get(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object
    ///
    /// Returns `Ok(())` even if the object didn't exist (idempotent).
    async fn delete(&self, path: &str) -> StorageResult<()>;
}

/// Join a prefix and a file name into an absolute `/`-separated path
pub fn object_path(prefix: &str, name: &str) -> StorageResult<String> {
    let name = name.trim_matches('/');
    if name.is_empty() || name.split('/').any(|part| part == ".." || part.is_empty()) {
        return Err(StorageError::InvalidPath(name.to_string()));
    }

    let prefix = prefix.trim_matches('/');
    Ok(if prefix.is_empty() {
        format!("/{name}")
    } else {
        format!("/{prefix}/{name}")
    })
}
