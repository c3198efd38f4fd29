use crate::error::SchemeResult;
use crate::key_id::KeyId;

/// A homomorphic cryptosystem bound to one parameter set and key pair.
///
/// Implementors are contexts: they own parameters and keys and are immutable
/// once generated, so a context can be shared freely across threads.
/// Encryption is randomized; test semantic round-trips, never ciphertext bytes.
pub trait HomomorphicScheme: Send + Sync {
    /// Plaintext shape accepted by `encrypt`
    type Plaintext;
    /// Opaque ciphertext handle
    type Ciphertext: Clone + Send;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Fingerprint of parameters + public key
    fn key_id(&self) -> KeyId;

    /// Whether this context can decrypt
    fn has_secret_key(&self) -> bool;

    /// Encrypt under the context's public key
    fn encrypt(&self, plaintext: &Self::Plaintext) -> SchemeResult<Self::Ciphertext>;

    /// Decrypt with the context's secret key
    ///
    /// Fails with `SchemeError::KeyUnavailable` on a public-only context.
    fn decrypt(&self, ciphertext: &Self::Ciphertext) -> SchemeResult<Self::Plaintext>;

    /// Homomorphic addition of two ciphertexts
    fn add(&self, lhs: &Self::Ciphertext, rhs: &Self::Ciphertext)
    -> SchemeResult<Self::Ciphertext>;

    /// Serialize a ciphertext to bytes
    fn serialize(&self, ciphertext: &Self::Ciphertext) -> Vec<u8>;

    /// Parse bytes produced by `serialize`, validating them against this context
    fn deserialize(&self, bytes: &[u8]) -> SchemeResult<Self::Ciphertext>;

    /// Copy of this context without the secret key
    fn public_only(&self) -> Self
    where
        Self: Sized;
}
