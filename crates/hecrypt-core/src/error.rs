use hecrypt_schemes::SchemeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Private key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Context mismatch: {0}")]
    ContextMismatch(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Compression error: {0}")]
    Compression(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::ContextUnavailable(_) => ErrorKind::ContextUnavailable,
            CoreError::KeyUnavailable(_) => ErrorKind::KeyUnavailable,
            CoreError::ContextMismatch(_) => ErrorKind::ContextMismatch,
            CoreError::Encoding(_) => ErrorKind::EncodingError,
            CoreError::Provider(_) => ErrorKind::ProviderError,
            CoreError::Serialization(_) => ErrorKind::SerializationError,
            CoreError::Compression(_) => ErrorKind::CompressionError,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<SchemeError> for CoreError {
    fn from(err: SchemeError) -> Self {
        match err {
            SchemeError::KeyUnavailable => CoreError::KeyUnavailable(err.to_string()),
            SchemeError::PlaintextOutOfRange { .. } => CoreError::Encoding(err.to_string()),
            SchemeError::Deserialization(_) => CoreError::Serialization(err.to_string()),
            other => CoreError::Provider(other.to_string()),
        }
    }
}

/// Machine-readable error category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    ContextUnavailable,
    KeyUnavailable,
    ContextMismatch,
    EncodingError,
    ProviderError,
    SerializationError,
    CompressionError,
    /// Remote storage failure; never produced by the core itself
    UploadError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::ContextUnavailable => "ContextUnavailable",
            ErrorKind::KeyUnavailable => "KeyUnavailable",
            ErrorKind::ContextMismatch => "ContextMismatch",
            ErrorKind::EncodingError => "EncodingError",
            ErrorKind::ProviderError => "ProviderError",
            ErrorKind::SerializationError => "SerializationError",
            ErrorKind::CompressionError => "CompressionError",
            ErrorKind::UploadError => "UploadError",
        };
        f.write_str(name)
    }
}

/// Kind + message, the only error shape that leaves the process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorReport {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&CoreError> for ErrorReport {
    fn from(err: &CoreError) -> Self {
        err.report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_errors_map_to_kinds() {
        let cases = [
            (SchemeError::KeyUnavailable, ErrorKind::KeyUnavailable),
            (
                SchemeError::PlaintextOutOfRange {
                    value: "70000".into(),
                    bound: "65537".into(),
                },
                ErrorKind::EncodingError,
            ),
            (
                SchemeError::Deserialization("short".into()),
                ErrorKind::SerializationError,
            ),
            (
                SchemeError::Encryption("boom".into()),
                ErrorKind::ProviderError,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(CoreError::from(err).kind(), kind);
        }
    }

    #[test]
    fn test_report_serializes_kind_and_message() {
        let report = CoreError::InvalidInput("missing file".into()).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "InvalidInput");
        assert_eq!(json["message"], "Invalid input: missing file");
    }
}
