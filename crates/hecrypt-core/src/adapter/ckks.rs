use hecrypt_schemes::{CkksContext, HomomorphicScheme};

use super::SchemeAdapter;
use crate::codec::EncodedContent;
use crate::error::{CoreError, CoreResult};
use crate::scheme::SchemeId;

/// Packs the whole sequence as reals; decryption rounds each slot to the
/// nearest integer before handing it to the codec.
pub struct CkksAdapter;

impl SchemeAdapter for CkksAdapter {
    type Scheme = CkksContext;

    const SCHEME: SchemeId = SchemeId::Ckks;

    fn encrypt(scheme: &CkksContext, content: &EncodedContent) -> CoreResult<Vec<u8>> {
        let bound = scheme.params().max_magnitude();
        if let Some(max) = content.max_value()
            && max as f64 >= bound
        {
            return Err(CoreError::Encoding(format!(
                "Code point {max} exceeds the CKKS magnitude bound {bound} for scale 2^{}",
                scheme.params().scale_bits
            )));
        }

        let values: Vec<f64> = content.as_slice().iter().map(|p| *p as f64).collect();
        let ct = scheme.encrypt(&values)?;
        Ok(scheme.serialize(&ct))
    }

    fn decrypt(scheme: &CkksContext, body: &[u8]) -> CoreResult<EncodedContent> {
        let ct = scheme.deserialize(body)?;
        let values = scheme.decrypt(&ct)?;

        let points = values
            .iter()
            .enumerate()
            .map(|(index, value)| round_to_code_point(*value, index))
            .collect::<CoreResult<Vec<u32>>>()?;

        Ok(EncodedContent::from_code_points(points))
    }
}

fn round_to_code_point(value: f64, index: usize) -> CoreResult<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > u32::MAX as f64 {
        return Err(CoreError::Encoding(format!(
            "Decrypted value {value} at position {index} does not round to a code point"
        )));
    }
    Ok(rounded as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use hecrypt_schemes::CkksParams;

    #[test]
    fn test_roundtrip_rounds_to_original() {
        let ctx = CkksContext::generate(&CkksParams::new(64, 40)).unwrap();
        let content = codec::encode("AB, then some text longer than one block of slots: 😀");
        let body = CkksAdapter::encrypt(&ctx, &content).unwrap();
        assert_eq!(CkksAdapter::decrypt(&ctx, &body).unwrap(), content);
    }

    #[test]
    fn test_rejects_code_points_beyond_magnitude_bound() {
        // 2^(61-50) = 2048
        let ctx = CkksContext::generate(&CkksParams::new(64, 50)).unwrap();
        assert!(CkksAdapter::encrypt(&ctx, &codec::encode("abc")).is_ok());
        assert!(matches!(
            CkksAdapter::encrypt(&ctx, &codec::encode("€")),
            Err(CoreError::Encoding(_))
        ));
    }

    #[test]
    fn test_round_to_code_point() {
        assert_eq!(round_to_code_point(64.996, 0).unwrap(), 65);
        assert_eq!(round_to_code_point(-0.3, 0).unwrap(), 0);
        assert!(round_to_code_point(-0.7, 0).is_err());
        assert!(round_to_code_point(f64::NAN, 0).is_err());
    }
}
