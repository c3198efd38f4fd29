use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

mod decrypt;
mod encrypt;
mod form;
mod health;
mod methods;
mod upload;

pub use decrypt::{DecryptRequest, DecryptResponse};
pub use encrypt::EncryptResponse;
pub use upload::{UploadAndEncryptResponse, UploadStatus};

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/methods", get(methods::list_methods))
        .route("/encrypt", post(encrypt::encrypt))
        .route("/decrypt", post(decrypt::decrypt))
        .route("/decrypt-artifact", post(decrypt::decrypt_artifact))
        .route("/upload-and-encrypt", post(upload::upload_and_encrypt))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
