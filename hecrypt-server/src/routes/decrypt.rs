use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DecryptRequest {
    pub method: String,
    pub encrypted_output: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub decrypted_content: String,
    pub method: String,
    pub message: String,
}

impl DecryptResponse {
    fn new(method: String, decrypted_content: String) -> Self {
        Self {
            message: format!(
                "Successfully decrypted using {} private key",
                method.to_uppercase()
            ),
            decrypted_content,
            method,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ArtifactQuery {
    pub method: String,
}

/// POST /decrypt
/// JSON `{method, encrypted_output}` where `encrypted_output` is the
/// `encrypted_data` string returned by `/encrypt`
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> ServerResult<Json<DecryptResponse>> {
    let Json(req) = body?;
    let method = req.method.trim().to_lowercase();

    let orchestrator = state.orchestrator.clone();
    let tag = method.clone();
    let content =
        tokio::task::spawn_blocking(move || orchestrator.run_decrypt(&tag, &req.encrypted_output))
            .await
            .map_err(|e| ServerError::Internal(format!("Decryption task failed: {e}")))??;

    Ok(Json(DecryptResponse::new(method, content)))
}

/// POST /decrypt-artifact?method=tag
/// Raw body is a persisted `.encrypted.zst` artifact
pub async fn decrypt_artifact(
    State(state): State<AppState>,
    query: Result<Query<ArtifactQuery>, QueryRejection>,
    body: Bytes,
) -> ServerResult<Json<DecryptResponse>> {
    let Query(query) = query?;
    let method = query.method.trim().to_lowercase();

    let orchestrator = state.orchestrator.clone();
    let tag = method.clone();
    let content =
        tokio::task::spawn_blocking(move || orchestrator.run_decrypt_packaged(&tag, &body))
            .await
            .map_err(|e| ServerError::Internal(format!("Decryption task failed: {e}")))??;

    Ok(Json(DecryptResponse::new(method, content)))
}
