//! Error types for cryptosystem operations

#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Secret key not available in this context")]
    KeyUnavailable,

    #[error("Plaintext value {value} out of range (must be below {bound})")]
    PlaintextOutOfRange { value: String, bound: String },

    #[error("Operand mismatch: {0}")]
    OperandMismatch(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}

pub type SchemeResult<T> = Result<T, SchemeError>;
