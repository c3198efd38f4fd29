use hecrypt_schemes::{BfvContext, HomomorphicScheme};

use super::SchemeAdapter;
use crate::codec::EncodedContent;
use crate::error::{CoreError, CoreResult};
use crate::scheme::SchemeId;

/// Packs the integer sequence directly; values must stay below the plaintext
/// modulus t or they would wrap.
pub struct BfvAdapter;

impl SchemeAdapter for BfvAdapter {
    type Scheme = BfvContext;

    const SCHEME: SchemeId = SchemeId::Bfv;

    fn encrypt(scheme: &BfvContext, content: &EncodedContent) -> CoreResult<Vec<u8>> {
        let t = scheme.params().plain_modulus;
        if let Some((index, point)) = content
            .as_slice()
            .iter()
            .enumerate()
            .find(|(_, p)| u64::from(**p) >= t)
        {
            return Err(CoreError::Encoding(format!(
                "Code point {point} at position {index} is not below the BFV plaintext modulus {t}"
            )));
        }

        let values: Vec<u64> = content.as_slice().iter().map(|p| u64::from(*p)).collect();
        let ct = scheme.encrypt(&values)?;
        Ok(scheme.serialize(&ct))
    }

    fn decrypt(scheme: &BfvContext, body: &[u8]) -> CoreResult<EncodedContent> {
        let ct = scheme.deserialize(body)?;
        let points = scheme
            .decrypt(&ct)?
            .into_iter()
            .map(|v| {
                u32::try_from(v).map_err(|_| {
                    CoreError::Encoding(format!("Decrypted value {v} is not a code point"))
                })
            })
            .collect::<CoreResult<Vec<u32>>>()?;
        Ok(EncodedContent::from_code_points(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use hecrypt_schemes::BfvParams;

    #[test]
    fn test_roundtrip_exact() {
        let ctx = BfvContext::generate(&BfvParams::new(64, 786_433)).unwrap();
        let content = codec::encode("AB ü 😀 and enough text to need a second block of coefficients");
        let body = BfvAdapter::encrypt(&ctx, &content).unwrap();
        assert_eq!(BfvAdapter::decrypt(&ctx, &body).unwrap(), content);
    }

    #[test]
    fn test_overflow_is_reported_not_wrapped() {
        let ctx = BfvContext::generate(&BfvParams::new(64, 257)).unwrap();
        assert!(BfvAdapter::encrypt(&ctx, &codec::encode("AB")).is_ok());

        let err = BfvAdapter::encrypt(&ctx, &codec::encode("Aé€")).unwrap_err();
        match err {
            CoreError::Encoding(msg) => {
                assert!(msg.contains("8364"), "{msg}");
                assert!(msg.contains("257"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
