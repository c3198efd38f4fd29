//! S3-compatible backend (AWS S3, Minio, Backblaze, ...)

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{StorageError, StorageResult};
use crate::traits::{PayloadStore, StoredObject};

/// Artifacts are stored at `{bucket}/{path without leading slash}`
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the environment
    ///
    /// - `S3_ENDPOINT` (default: http://localhost:9000)
    /// - `S3_ACCESS_KEY` / `S3_SECRET_KEY` (default: minioadmin)
    /// - `S3_REGION` (default: us-east-1)
    pub async fn from_env(bucket: impl Into<String>) -> StorageResult<Self> {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        let creds = aws_sdk_s3::config::Credentials::new(
            var("S3_ACCESS_KEY", "minioadmin"),
            var("S3_SECRET_KEY", "minioadmin"),
            None,
            None,
            "hecrypt",
        );

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(var("S3_ENDPOINT", "http://localhost:9000"))
            .region(aws_sdk_s3::config::Region::new(var("S3_REGION", "us-east-1")))
            .credentials_provider(creds)
            .force_path_style(true)
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .build();

        Ok(Self::new(Client::from_conf(config), bucket))
    }

    /// Create the bucket if it does not exist yet
    pub async fn ensure_bucket(&self) -> StorageResult<()> {
        if self.client.head_bucket().bucket(&self.bucket).send().await.is_ok() {
            return Ok(());
        }
        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to create bucket: {e}")))?;
        Ok(())
    }

    fn key(path: &str) -> &str {
        path.trim_start_matches('/')
    }
}

#[async_trait]
impl PayloadStore for S3Store {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn put(&self, path: &str, data: &[u8]) -> StorageResult<StoredObject> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(Self::key(path))
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 PUT failed: {e}")))?;

        Ok(StoredObject {
            backend: self.name().to_string(),
            path: format!("s3://{}/{}", self.bucket, Self::key(path)),
            size: data.len() as u64,
        })
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(Self::key(path))
            .send()
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    StorageError::NotFound(path.to_string())
                } else {
                    StorageError::Backend(format!("S3 GET failed: {e}"))
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read body: {e}")))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(Self::key(path))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 DELETE failed: {e}")))?;

        Ok(())
    }
}

fn is_not_found<E>(err: &SdkError<E>) -> bool {
    matches!(err, SdkError::ServiceError(e) if e.raw().status().as_u16() == 404)
}
