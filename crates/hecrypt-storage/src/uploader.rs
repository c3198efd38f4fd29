//! Store resolution and batch uploads

use std::sync::Arc;
use std::time::Duration;

use crate::config::{BackendKind, StorageConfig};
use crate::dropbox::DropboxStore;
use crate::error::{StorageError, StorageResult};
use crate::memory::InMemoryStore;
use crate::retry::{RetryPolicy, UploadOutcome, UploadReport, upload_with_retry};
use crate::traits::{PayloadStore, object_path};

/// Decides where artifacts go and uploads them with retry
pub struct Uploader {
    config: StorageConfig,
    /// Store for requests that bring no token of their own
    default_store: Option<Arc<dyn PayloadStore>>,
    policy: RetryPolicy,
}

impl Uploader {
    pub async fn from_config(config: StorageConfig) -> StorageResult<Self> {
        let default_store: Option<Arc<dyn PayloadStore>> = match config.backend {
            BackendKind::None => None,
            BackendKind::Memory => Some(Arc::new(InMemoryStore::new())),
            BackendKind::Dropbox => config.token().map(|token| {
                Arc::new(dropbox_store(&config, token)) as Arc<dyn PayloadStore>
            }),
            BackendKind::S3 => Some(s3_store(&config).await?),
        };

        match &default_store {
            Some(store) => tracing::info!(backend = store.name(), "uploads enabled"),
            None => tracing::info!(backend = ?config.backend, "no default upload target"),
        }

        Ok(Self {
            policy: RetryPolicy::from(&config.retry),
            config,
            default_store,
        })
    }

    /// Uploader with an explicit store (tests, embedding)
    pub fn with_store(store: Arc<dyn PayloadStore>, policy: RetryPolicy) -> Self {
        Self {
            config: StorageConfig::default(),
            default_store: Some(store),
            policy,
        }
    }

    /// Uploader that skips every upload without a request token
    pub fn disabled() -> Self {
        Self {
            config: StorageConfig {
                backend: BackendKind::None,
                ..Default::default()
            },
            default_store: None,
            policy: RetryPolicy::none(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.default_store.is_some()
    }

    /// Store for a request: a non-blank request token selects a Dropbox store
    /// for that token, otherwise the configured default (if any).
    pub fn resolve(&self, request_token: Option<&str>) -> Option<Arc<dyn PayloadStore>> {
        match request_token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => Some(Arc::new(dropbox_store(&self.config, token))),
            None => self.default_store.clone(),
        }
    }

    /// Upload every artifact. Without a store each one is reported as skipped.
    pub async fn upload_all(
        &self,
        request_token: Option<&str>,
        artifacts: &[(String, Vec<u8>)],
    ) -> Vec<UploadReport> {
        let store = self.resolve(request_token);
        let mut reports = Vec::with_capacity(artifacts.len());

        for (name, data) in artifacts {
            let report = match (&store, object_path(&self.config.path_prefix, name)) {
                (_, Err(e)) => failed_path(name, e),
                (None, Ok(path)) => UploadReport::skipped(path, "No storage token configured"),
                (Some(store), Ok(path)) => {
                    upload_with_retry(store.as_ref(), &path, data, &self.policy).await
                }
            };
            reports.push(report);
        }

        reports
    }
}

fn failed_path(name: &str, error: StorageError) -> UploadReport {
    UploadReport {
        path: name.to_string(),
        attempts: 0,
        total_backoff: Duration::ZERO,
        outcome: UploadOutcome::Failed {
            retryable: false,
            error: error.to_string(),
        },
    }
}

fn dropbox_store(config: &StorageConfig, token: &str) -> DropboxStore {
    DropboxStore::with_endpoints(token, &config.dropbox_content_url, &config.dropbox_api_url)
}

#[cfg(feature = "s3")]
async fn s3_store(config: &StorageConfig) -> StorageResult<Arc<dyn PayloadStore>> {
    let bucket = config
        .s3_bucket
        .clone()
        .ok_or_else(|| StorageError::NotConfigured("s3_bucket is required".to_string()))?;
    let store = crate::s3::S3Store::from_env(bucket).await?;
    store.ensure_bucket().await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "s3"))]
async fn s3_store(_config: &StorageConfig) -> StorageResult<Arc<dyn PayloadStore>> {
    Err(StorageError::NotConfigured(
        "built without the `s3` feature".to_string(),
    ))
}
