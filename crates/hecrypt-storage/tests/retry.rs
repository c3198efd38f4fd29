//! Retry behaviour against failing stores

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hecrypt_storage::*;

/// Fails the first `failures` puts with the error produced by `make_error`
struct FlakyStore {
    inner: InMemoryStore,
    failures: u32,
    calls: AtomicU32,
    make_error: fn() -> StorageError,
}

impl FlakyStore {
    fn new(failures: u32, make_error: fn() -> StorageError) -> Self {
        Self {
            inner: InMemoryStore::new(),
            failures,
            calls: AtomicU32::new(0),
            make_error,
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PayloadStore for FlakyStore {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn put(&self, path: &str, data: &[u8]) -> StorageResult<StoredObject> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err((self.make_error)());
        }
        self.inner.put(path, data).await
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.inner.get(path).await
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.inner.delete(path).await
    }
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
        multiplier: 2.0,
    }
}

fn backend_error() -> StorageError {
    StorageError::Backend("HTTP 503".into())
}

#[tokio::test]
async fn test_succeeds_after_transient_failures() {
    let store = FlakyStore::new(2, backend_error);
    let report = upload_with_retry(&store, "/a", b"artifact", &fast_policy(3)).await;

    assert!(report.is_uploaded());
    assert_eq!(report.attempts, 3);
    assert_eq!(report.total_backoff, Duration::from_millis(15));
    assert_eq!(store.get("/a").await.unwrap(), b"artifact");
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let store = FlakyStore::new(10, backend_error);
    let report = upload_with_retry(&store, "/a", b"artifact", &fast_policy(3)).await;

    assert!(!report.is_uploaded());
    assert_eq!(report.attempts, 3);
    assert_eq!(store.calls(), 3);
    match &report.outcome {
        UploadOutcome::Failed { error, retryable } => {
            assert!(retryable);
            assert!(error.contains("503"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_permanent_failure_is_not_retried() {
    let store = FlakyStore::new(10, || StorageError::Unauthorized("expired token".into()));
    let report = upload_with_retry(&store, "/a", b"artifact", &fast_policy(5)).await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.total_backoff, Duration::ZERO);
    assert_eq!(store.calls(), 1);
    assert!(matches!(
        report.outcome,
        UploadOutcome::Failed { retryable: false, .. }
    ));
}

#[tokio::test]
async fn test_uploader_reports_each_artifact() {
    let store = Arc::new(FlakyStore::new(1, backend_error));
    let uploader = Uploader::with_store(store.clone(), fast_policy(2));

    let reports = uploader
        .upload_all(
            None,
            &[
                ("doc.txt.bfv.encrypted.zst".into(), vec![1, 2]),
                ("doc.txt.ckks.encrypted.zst".into(), vec![3, 4]),
            ],
        )
        .await;

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(UploadReport::is_uploaded));
    assert_eq!(reports[0].attempts, 2);
    assert_eq!(reports[1].attempts, 1);
    assert_eq!(store.calls(), 3);
}
