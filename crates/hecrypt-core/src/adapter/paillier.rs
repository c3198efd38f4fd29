use hecrypt_schemes::{BigUint, HomomorphicScheme, PaillierContext};
use num_traits::ToPrimitive;

use super::SchemeAdapter;
use crate::codec::EncodedContent;
use crate::error::{CoreError, CoreResult};
use crate::scheme::SchemeId;

/// One Paillier ciphertext per code point.
///
/// Body format: `[count: u32 LE][count × fixed-width ciphertext]`, in sequence
/// order. Every ciphertext has the width of n², so element boundaries never
/// need their own length prefixes.
pub struct PaillierAdapter;

impl SchemeAdapter for PaillierAdapter {
    type Scheme = PaillierContext;

    const SCHEME: SchemeId = SchemeId::Paillier;

    fn encrypt(scheme: &PaillierContext, content: &EncodedContent) -> CoreResult<Vec<u8>> {
        if let Some(max) = content.max_value() {
            let max = BigUint::from(max);
            if &max >= scheme.public_key().modulus() {
                return Err(CoreError::Encoding(format!(
                    "Code point {max} exceeds the Paillier modulus"
                )));
            }
        }

        let width = scheme.public_key().ciphertext_len();
        let mut body = Vec::with_capacity(4 + content.len() * width);
        body.extend((content.len() as u32).to_le_bytes());

        for point in content.as_slice() {
            let ct = scheme.encrypt(&BigUint::from(*point))?;
            body.extend(scheme.serialize(&ct));
        }

        Ok(body)
    }

    fn decrypt(scheme: &PaillierContext, body: &[u8]) -> CoreResult<EncodedContent> {
        let (count, rest) = body.split_at_checked(4).ok_or_else(|| {
            CoreError::Serialization("Paillier payload missing element count".to_string())
        })?;
        let count = u32::from_le_bytes(
            count
                .try_into()
                .map_err(|_| CoreError::Serialization("Invalid element count".to_string()))?,
        ) as usize;

        let width = scheme.public_key().ciphertext_len();
        if rest.len() != count * width {
            return Err(CoreError::Serialization(format!(
                "Paillier payload holds {} bytes, expected {count} ciphertexts of {width} bytes",
                rest.len()
            )));
        }

        let mut points = Vec::with_capacity(count);
        for (index, chunk) in rest.chunks_exact(width).enumerate() {
            let ct = scheme.deserialize(chunk)?;
            let value = scheme.decrypt(&ct)?;
            let point = value.to_u32().ok_or_else(|| {
                CoreError::Encoding(format!(
                    "Decrypted value at position {index} is not a code point"
                ))
            })?;
            points.push(point);
        }

        Ok(EncodedContent::from_code_points(points))
    }
}
