//! Storage configuration

use serde::{Deserialize, Serialize};

use crate::dropbox::{DEFAULT_API_URL, DEFAULT_CONTENT_URL};
use crate::retry::RetryConfig;

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV_VAR: &str = "DROPBOX_ACCESS_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Never upload
    None,
    /// Process-local store, for tests and demos
    Memory,
    #[default]
    Dropbox,
    S3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// Dropbox bearer token. A token sent with a request takes precedence.
    pub access_token: Option<String>,
    /// Folder artifacts are written under ("" = root)
    pub path_prefix: String,
    pub s3_bucket: Option<String>,
    pub dropbox_content_url: String,
    pub dropbox_api_url: String,
    pub retry: RetryConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            access_token: None,
            path_prefix: String::new(),
            s3_bucket: None,
            dropbox_content_url: DEFAULT_CONTENT_URL.to_string(),
            dropbox_api_url: DEFAULT_API_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl StorageConfig {
    /// Fill a missing token from `DROPBOX_ACCESS_TOKEN`
    pub fn with_env_token(mut self) -> Self {
        if self.token().is_none() {
            self.access_token = std::env::var(TOKEN_ENV_VAR)
                .ok()
                .filter(|t| !t.trim().is_empty());
        }
        self
    }

    /// Configured token, ignoring blank values
    pub fn token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, BackendKind::Dropbox);
        assert_eq!(config.token(), None);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_backoff_ms, 1000);
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = StorageConfig {
            access_token: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(config.token(), None);
    }

    #[test]
    fn test_backend_names() {
        let config: StorageConfig =
            serde_json::from_str(r#"{"backend": "memory", "retry": {"max_attempts": 5}}"#).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.max_backoff_ms, 30_000);
    }
}
