//! Multipart upload form shared by `/encrypt` and `/upload-and-encrypt`

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::extract::Multipart;
use hecrypt_core::{BatchResult, MethodRequest};

pub struct UploadForm {
    pub filename: String,
    pub content: String,
    pub method: MethodRequest,
    pub dropbox_token: Option<String>,
}

impl UploadForm {
    /// Read `file`, `method` and `dropbox_token` parts; unknown parts are ignored
    pub async fn read(mut multipart: Multipart) -> ServerResult<Self> {
        let mut file: Option<(Option<String>, Vec<u8>)> = None;
        let mut method: Option<String> = None;
        let mut dropbox_token: Option<String> = None;

        while let Some(field) = multipart.next_field().await? {
            match field.name() {
                Some("file") => {
                    let filename = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await?;
                    file = Some((filename, bytes.to_vec()));
                }
                Some("method") => method = Some(field.text().await?),
                Some("dropbox_token") => dropbox_token = Some(field.text().await?),
                _ => {}
            }
        }

        let (filename, bytes) = file.ok_or_else(|| ServerError::invalid_input("No file provided"))?;
        let filename = filename
            .as_deref()
            .map(base_name)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ServerError::invalid_input("No file selected"))?;

        let content = String::from_utf8(bytes)
            .map_err(|_| ServerError::invalid_input("File content is not valid UTF-8"))?;

        Ok(Self {
            filename,
            content,
            method: MethodRequest::parse(method.as_deref())?,
            dropbox_token: dropbox_token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        })
    }

    /// Character count, as reported to callers
    pub fn original_size(&self) -> usize {
        self.content.chars().count()
    }
}

/// Drop any client-side directory components
fn base_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or_default().trim().to_string()
}

/// Run a batch off the async workers
pub async fn run_batch(
    state: &AppState,
    content: String,
    method: MethodRequest,
) -> ServerResult<BatchResult> {
    let orchestrator = state.orchestrator.clone();
    let batch = tokio::task::spawn_blocking(move || orchestrator.run(&content, &method))
        .await
        .map_err(|e| ServerError::Internal(format!("Encryption task failed: {e}")))??;
    Ok(batch)
}
