use crate::state::AppState;
use axum::{Json, extract::State};
use hecrypt_core::ContextInfo;
use serde::Serialize;

#[derive(Serialize)]
pub struct MethodsResponse {
    pub methods: Vec<ContextInfo>,
    /// Whether uploads happen without a per-request token
    pub upload_enabled: bool,
}

/// GET /methods
pub async fn list_methods(State(state): State<AppState>) -> Json<MethodsResponse> {
    Json(MethodsResponse {
        methods: state.orchestrator.contexts().info(),
        upload_enabled: state.uploader.is_enabled(),
    })
}
