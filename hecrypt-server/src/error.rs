use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hecrypt_core::{CoreError, ErrorKind};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Malformed JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Malformed query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ServerError::Core(CoreError::InvalidInput(message.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::Core(e) => e.kind(),
            ServerError::Multipart(_) | ServerError::Json(_) | ServerError::Query(_) => {
                ErrorKind::InvalidInput
            }
            ServerError::Internal(_) => ErrorKind::ProviderError,
        }
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput
        | ErrorKind::SerializationError
        | ErrorKind::CompressionError => StatusCode::BAD_REQUEST,
        ErrorKind::KeyUnavailable => StatusCode::FORBIDDEN,
        ErrorKind::ContextUnavailable => StatusCode::NOT_FOUND,
        ErrorKind::EncodingError | ErrorKind::ContextMismatch => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ProviderError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::UploadError => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match &self {
            // Oversized bodies surface here with 413
            ServerError::Multipart(e) => (e.status(), e.body_text()),
            ServerError::Json(e) => (e.status(), e.body_text()),
            ServerError::Query(e) => (e.status(), e.body_text()),
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            ServerError::Core(e) => {
                let status = status_for(kind);
                if status.is_server_error() {
                    tracing::error!(kind = %kind, error = %e, "request failed");
                } else {
                    tracing::debug!(kind = %kind, error = %e, "request rejected");
                }
                (status, e.to_string())
            }
        };

        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::CompressionError), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::KeyUnavailable), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::ContextUnavailable), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::ContextMismatch),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ErrorKind::UploadError), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let response = ServerError::Internal("worker panicked at src/x.rs:1".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_error_status() {
        let response = ServerError::from(CoreError::KeyUnavailable("bfv".into())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ServerError::invalid_input("No file provided").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
