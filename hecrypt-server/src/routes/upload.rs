use super::form::{UploadForm, run_batch};
use crate::error::ServerResult;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, State},
};
use hecrypt_core::packager::artifact_name;
use hecrypt_core::{BatchResult, ErrorKind, SchemeId};
use hecrypt_storage::{UploadOutcome, UploadReport};
use serde::Serialize;
use std::time::Duration;

/// Upload report tagged with the error kind when the upload failed
#[derive(Debug, Serialize)]
pub struct UploadStatus {
    pub method: SchemeId,
    #[serde(flatten)]
    pub report: UploadReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl UploadStatus {
    fn new(method: SchemeId, report: UploadReport) -> Self {
        let kind = report.error().map(|_| ErrorKind::UploadError);
        Self {
            method,
            report,
            kind,
        }
    }
}

#[derive(Serialize)]
pub struct UploadAndEncryptResponse {
    pub filename: String,
    pub original_size: usize,
    /// Encryption outcome per method
    #[serde(flatten)]
    pub batch: BatchResult,
    /// Upload outcome per successfully encrypted method
    pub uploads: Vec<UploadStatus>,
}

/// POST /upload-and-encrypt
/// As `/encrypt`, plus an optional `dropbox_token` part. Encryption results
/// are returned even when every upload fails.
pub async fn upload_and_encrypt(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Json<UploadAndEncryptResponse>> {
    let form = UploadForm::read(multipart).await?;
    let original_size = form.original_size();

    let batch = run_batch(&state, form.content, form.method).await?;

    let mut uploads = Vec::new();
    let mut methods = Vec::new();
    let mut artifacts = Vec::new();
    for result in batch.successes() {
        let name = artifact_name(&form.filename, result.method);
        match result.package() {
            Ok(data) => {
                methods.push(result.method);
                artifacts.push((name, data));
            }
            Err(e) => uploads.push(UploadStatus::new(
                result.method,
                UploadReport {
                    path: name,
                    attempts: 0,
                    total_backoff: Duration::ZERO,
                    outcome: UploadOutcome::Failed {
                        error: e.to_string(),
                        retryable: false,
                    },
                },
            )),
        }
    }

    let reports = state
        .uploader
        .upload_all(form.dropbox_token.as_deref(), &artifacts)
        .await;
    uploads.extend(
        methods
            .into_iter()
            .zip(reports)
            .map(|(method, report)| UploadStatus::new(method, report)),
    );

    tracing::info!(
        filename = %form.filename,
        encrypted = batch.successes().count(),
        uploaded = uploads.iter().filter(|u| u.report.is_uploaded()).count(),
        "upload-and-encrypt request complete"
    );

    Ok(Json(UploadAndEncryptResponse {
        filename: form.filename,
        original_size,
        batch,
        uploads,
    }))
}
