//! Ciphertext envelope
//!
//! Wire format:
//!
//! ```text
//! [version: u8][scheme: u8][key_id: 32 bytes][scheme body...]
//! ```
//!
//! The header binds a ciphertext to the scheme and key that produced it, so a
//! payload presented to the wrong context is rejected before any decryption.

use hecrypt_schemes::KeyId;

use crate::error::{CoreError, CoreResult};
use crate::scheme::SchemeId;

pub const ENVELOPE_VERSION: u8 = 1;

const HEADER_LEN: usize = 2 + KeyId::LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub scheme: SchemeId,
    pub key_id: KeyId,
    pub body: Vec<u8>,
}

impl Envelope {
    pub fn new(scheme: SchemeId, key_id: KeyId, body: Vec<u8>) -> Self {
        Self {
            scheme,
            key_id,
            body,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.body.len());
        out.push(ENVELOPE_VERSION);
        out.push(self.scheme as u8);
        out.extend_from_slice(self.key_id.as_bytes());
        out.extend_from_slice(&self.body);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(CoreError::Serialization(format!(
                "Ciphertext envelope too short: {} bytes",
                bytes.len()
            )));
        }

        let version = bytes[0];
        if version != ENVELOPE_VERSION {
            return Err(CoreError::Serialization(format!(
                "Unsupported envelope version: {version}"
            )));
        }

        let scheme = SchemeId::try_from(bytes[1])?;
        let key_id: [u8; KeyId::LEN] = bytes[2..HEADER_LEN]
            .try_into()
            .map_err(|_| CoreError::Serialization("Invalid key id".to_string()))?;

        Ok(Self {
            scheme,
            key_id: KeyId::from_bytes(key_id),
            body: bytes[HEADER_LEN..].to_vec(),
        })
    }

    /// Check that this envelope was produced under `scheme` with `key_id`
    pub fn verify(&self, scheme: SchemeId, key_id: KeyId) -> CoreResult<()> {
        if self.scheme != scheme {
            return Err(CoreError::ContextMismatch(format!(
                "Payload was encrypted with {} but {} was requested",
                self.scheme, scheme
            )));
        }
        if self.key_id != key_id {
            return Err(CoreError::ContextMismatch(format!(
                "Payload key {} does not match the {} context key {}",
                self.key_id, scheme, key_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> KeyId {
        KeyId::from_bytes([byte; 32])
    }

    #[test]
    fn test_roundtrip() {
        let env = Envelope::new(SchemeId::Ckks, key(7), vec![1, 2, 3]);
        let bytes = env.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN + 3);
        assert_eq!(Envelope::from_bytes(&bytes).unwrap(), env);
    }

    #[test]
    fn test_empty_body_is_valid() {
        let env = Envelope::new(SchemeId::Bfv, key(1), vec![]);
        assert_eq!(Envelope::from_bytes(&env.to_bytes()).unwrap(), env);
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(matches!(
            Envelope::from_bytes(&[1, 0]),
            Err(CoreError::Serialization(_))
        ));

        let mut bytes = Envelope::new(SchemeId::Bfv, key(1), vec![]).to_bytes();
        bytes[0] = 9;
        assert!(Envelope::from_bytes(&bytes).is_err());

        bytes[0] = ENVELOPE_VERSION;
        bytes[1] = 77;
        assert!(Envelope::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_verify() {
        let env = Envelope::new(SchemeId::Bfv, key(1), vec![]);
        env.verify(SchemeId::Bfv, key(1)).unwrap();
        assert!(matches!(
            env.verify(SchemeId::Ckks, key(1)),
            Err(CoreError::ContextMismatch(_))
        ));
        assert!(matches!(
            env.verify(SchemeId::Bfv, key(2)),
            Err(CoreError::ContextMismatch(_))
        ));
    }
}
