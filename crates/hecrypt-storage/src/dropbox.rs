//! Dropbox backend over the HTTP API

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{StorageError, StorageResult};
use crate::traits::{PayloadStore, StoredObject};

pub const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";
pub const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";

/// Dropbox store authenticated with a bearer token
///
/// Uploads use `overwrite` mode, so re-uploading an artifact replaces it.
pub struct DropboxStore {
    client: Client,
    token: String,
    content_url: String,
    api_url: String,
}

#[derive(Deserialize)]
struct FileMetadata {
    path_display: Option<String>,
    size: Option<u64>,
}

impl DropboxStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_endpoints(token, DEFAULT_CONTENT_URL, DEFAULT_API_URL)
    }

    /// Point at alternative endpoints (proxies, local test servers)
    pub fn with_endpoints(
        token: impl Into<String>,
        content_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            content_url: content_url.into().trim_end_matches('/').to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn check(response: Response, path: &str) -> StorageResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, path, &body))
    }
}

/// Map a Dropbox HTTP failure onto the storage taxonomy
fn status_error(status: StatusCode, path: &str, body: &str) -> StorageError {
    let detail = format!("{path}: HTTP {status}: {}", body.trim());
    match status.as_u16() {
        401 | 403 => StorageError::Unauthorized(detail),
        404 => StorageError::NotFound(detail),
        409 if body.contains("not_found") => StorageError::NotFound(detail),
        409 => StorageError::Conflict(detail),
        429 => StorageError::RateLimited(detail),
        408 => StorageError::Backend(detail),
        400..=499 => StorageError::BadRequest(detail),
        _ => StorageError::Backend(detail),
    }
}

/// JSON for the `Dropbox-API-Arg` header.
///
/// The header must be ASCII, so every char above 0x7E is written as a
/// `\uXXXX` escape (surrogate pairs outside the BMP).
fn api_arg(value: &Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

fn transport_error(err: reqwest::Error) -> StorageError {
    StorageError::Backend(format!("Dropbox request failed: {err}"))
}

#[async_trait]
impl PayloadStore for DropboxStore {
    fn name(&self) -> &'static str {
        "dropbox"
    }

    async fn put(&self, path: &str, data: &[u8]) -> StorageResult<StoredObject> {
        let arg = json!({
            "path": path,
            "mode": "overwrite",
            "autorename": false,
            "mute": true,
        });

        let response = self
            .client
            .post(format!("{}/2/files/upload", self.content_url))
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", api_arg(&arg))
            .header("Content-Type", "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await
            .map_err(transport_error)?;

        let metadata: FileMetadata = Self::check(response, path)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Backend(format!("Invalid upload response: {e}")))?;

        Ok(StoredObject {
            backend: self.name().to_string(),
            path: metadata.path_display.unwrap_or_else(|| path.to_string()),
            size: metadata.size.unwrap_or(data.len() as u64),
        })
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        let response = self
            .client
            .post(format!("{}/2/files/download", self.content_url))
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", api_arg(&json!({ "path": path })))
            .send()
            .await
            .map_err(transport_error)?;

        let bytes = Self::check(response, path)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let response = self
            .client
            .post(format!("{}/2/files/delete_v2", self.api_url))
            .bearer_auth(&self.token)
            .json(&json!({ "path": path }))
            .send()
            .await
            .map_err(transport_error)?;

        match Self::check(response, path).await {
            Ok(_) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
