//! hecrypt-storage: remote storage for encrypted artifacts
//!
//! Encryption and upload are independent outcomes. This crate never sees
//! plaintext or keys; it receives finished artifacts and reports, per
//! artifact, whether they reached the store and after how many attempts.
//!
//! ## Backends
//!
//! | Backend         | Use Case                    | Feature Flag |
//! |-----------------|-----------------------------|--------------|
//! | `InMemoryStore` | Unit tests, `memory` backend| (always)     |
//! | `DropboxStore`  | Token-based remote upload   | (always)     |
//! | `S3Store`       | Minio / AWS S3              | `s3`         |
//!
//! ## Example
//!
//! ```rust,ignore
//! use hecrypt_storage::{InMemoryStore, RetryPolicy, upload_with_retry};
//!
//! let store = InMemoryStore::new();
//! let report = upload_with_retry(&store, "/doc.txt.bfv.encrypted.zst", &artifact, &RetryPolicy::default()).await;
//! assert!(report.is_uploaded());
//! ```

mod config;
mod dropbox;
mod error;
mod memory;
mod retry;
mod traits;
mod uploader;

#[cfg(feature = "s3")]
mod s3;

pub use config::{BackendKind, StorageConfig, TOKEN_ENV_VAR};
pub use dropbox::DropboxStore;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use retry::{RetryConfig, RetryPolicy, UploadOutcome, UploadReport, upload_with_retry};
pub use traits::{PayloadStore, StoredObject, object_path};
pub use uploader::Uploader;

#[cfg(feature = "s3")]
pub use s3::S3Store;
