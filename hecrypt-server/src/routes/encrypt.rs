use super::form::{UploadForm, run_batch};
use crate::error::ServerResult;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, State},
};
use hecrypt_core::{BatchResult, codec};
use serde::Serialize;

#[derive(Serialize)]
pub struct EncryptResponse {
    pub filename: String,
    /// Content length in characters
    pub original_size: usize,
    /// Space-separated code points of the content, as fed to every scheme
    pub ascii_output: String,
    #[serde(flatten)]
    pub batch: BatchResult,
}

/// POST /encrypt
/// Multipart `file` plus optional `method` (`all`, a tag, or a comma-separated list)
pub async fn encrypt(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Json<EncryptResponse>> {
    let form = UploadForm::read(multipart).await?;
    let original_size = form.original_size();
    let ascii_output = codec::encode(&form.content).to_string();

    let batch = run_batch(&state, form.content, form.method).await?;
    tracing::info!(
        filename = %form.filename,
        succeeded = batch.successes().count(),
        failed = batch.failures().count(),
        "encrypt request complete"
    );

    Ok(Json(EncryptResponse {
        filename: form.filename,
        original_size,
        ascii_output,
        batch,
    }))
}
