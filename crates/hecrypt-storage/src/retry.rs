//! Retrying uploads with exponential backoff
//!
//! Retries only ever re-send bytes that are already packaged; nothing here
//! reaches back into encryption.

use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::StorageError;
use crate::traits::{PayloadStore, StoredObject};

/// Serializable retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Delay before attempt `attempt` (1-based; the first attempt never waits)
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = self.multiplier.max(1.0).powi(attempt as i32 - 2);
        let millis = (self.initial_backoff.as_millis() as f64 * factor).round();
        if !millis.is_finite() || millis >= self.max_backoff.as_millis() as f64 {
            return self.max_backoff;
        }
        Duration::from_millis(millis as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            multiplier: config.multiplier,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        config.clone().into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Uploaded(StoredObject),
    Failed { error: String, retryable: bool },
    Skipped { reason: String },
}

/// What happened to one upload, independent of the encryption that produced
/// the bytes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReport {
    pub path: String,
    pub attempts: u32,
    #[serde(rename = "total_backoff_ms", serialize_with = "as_millis")]
    pub total_backoff: Duration,
    #[serde(flatten)]
    pub outcome: UploadOutcome,
}

impl UploadReport {
    pub fn skipped(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attempts: 0,
            total_backoff: Duration::ZERO,
            outcome: UploadOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self.outcome, UploadOutcome::Uploaded(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            UploadOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Upload `data`, retrying transient failures according to `policy`.
///
/// Never returns an error: the report carries the final outcome and how many
/// attempts it took.
pub async fn upload_with_retry(
    store: &dyn PayloadStore,
    path: &str,
    data: &[u8],
    policy: &RetryPolicy,
) -> UploadReport {
    let mut total_backoff = Duration::ZERO;
    let mut attempt = 0;

    let outcome = loop {
        attempt += 1;

        let backoff = policy.backoff_before(attempt);
        if !backoff.is_zero() {
            tracing::debug!(path, attempt, backoff_ms = backoff.as_millis() as u64, "backing off");
            tokio::time::sleep(backoff).await;
            total_backoff += backoff;
        }

        match store.put(path, data).await {
            Ok(stored) => {
                tracing::info!(
                    backend = store.name(),
                    path,
                    attempt,
                    size = stored.size,
                    "upload complete"
                );
                break UploadOutcome::Uploaded(stored);
            }
            Err(e) => {
                let retryable = e.is_retryable();
                tracing::warn!(
                    backend = store.name(),
                    path,
                    attempt,
                    retryable,
                    error = %e,
                    "upload attempt failed"
                );
                if !retryable || attempt >= policy.max_attempts {
                    break failed(e);
                }
            }
        }
    };

    UploadReport {
        path: path.to_string(),
        attempts: attempt,
        total_backoff,
        outcome,
    }
}

fn failed(error: StorageError) -> UploadOutcome {
    UploadOutcome::Failed {
        retryable: error.is_retryable(),
        error: error.to_string(),
    }
}
