//! Parameter sets for the three cryptosystems

use crate::error::{SchemeError, SchemeResult};

/// Paillier parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaillierParams {
    /// Bit length of the modulus n = p·q
    pub modulus_bits: u64,
}

impl PaillierParams {
    /// Smallest modulus accepted. Anything below this is only useful in tests
    /// and still large enough to hold every Unicode code point.
    pub const MIN_MODULUS_BITS: u64 = 64;

    pub fn new(modulus_bits: u64) -> Self {
        Self { modulus_bits }
    }

    pub fn validate(&self) -> SchemeResult<()> {
        if self.modulus_bits < Self::MIN_MODULUS_BITS || self.modulus_bits % 2 != 0 {
            return Err(SchemeError::InvalidParameters(format!(
                "Paillier modulus_bits must be even and >= {} (got {})",
                Self::MIN_MODULUS_BITS,
                self.modulus_bits
            )));
        }
        Ok(())
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.modulus_bits.to_le_bytes().to_vec()
    }
}

impl Default for PaillierParams {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// CKKS parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CkksParams {
    /// Ring degree N (power of two). Each block holds N/2 real slots.
    pub poly_degree: usize,
    /// Encoding scale is 2^scale_bits
    pub scale_bits: u32,
}

impl CkksParams {
    pub fn new(poly_degree: usize, scale_bits: u32) -> Self {
        Self {
            poly_degree,
            scale_bits,
        }
    }

    pub fn slots(&self) -> usize {
        self.poly_degree / 2
    }

    pub fn scale(&self) -> f64 {
        (self.scale_bits as f64).exp2()
    }

    /// Exclusive magnitude bound on encodable values.
    ///
    /// Scaled coefficients must stay below 2^61 so that the decryption noise
    /// cannot push them across the signed wrap-around of the native modulus.
    pub fn max_magnitude(&self) -> f64 {
        (61u32.saturating_sub(self.scale_bits) as f64).exp2()
    }

    pub fn validate(&self) -> SchemeResult<()> {
        validate_degree("CKKS", self.poly_degree)?;
        if !(20..=50).contains(&self.scale_bits) {
            return Err(SchemeError::InvalidParameters(format!(
                "CKKS scale_bits must be within 20..=50 (got {})",
                self.scale_bits
            )));
        }
        Ok(())
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = (self.poly_degree as u64).to_le_bytes().to_vec();
        out.extend(self.scale_bits.to_le_bytes());
        out
    }
}

impl Default for CkksParams {
    fn default() -> Self {
        Self::new(4096, 40)
    }
}

/// BFV parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BfvParams {
    /// Ring degree N (power of two). Each block holds N integer coefficients.
    pub poly_degree: usize,
    /// Plaintext modulus t
    pub plain_modulus: u64,
}

impl BfvParams {
    /// Largest plaintext modulus. Above 2^30 the rounding error of Δ itself
    /// (up to t²/2^64) can flip a result once a homomorphic sum wraps past t.
    pub const MAX_PLAIN_MODULUS: u64 = 1 << 30;

    pub fn new(poly_degree: usize, plain_modulus: u64) -> Self {
        Self {
            poly_degree,
            plain_modulus,
        }
    }

    pub fn slots(&self) -> usize {
        self.poly_degree
    }

    /// Scaling factor Δ = ⌊2^64 / t⌋
    pub fn delta(&self) -> u64 {
        u64::MAX / self.plain_modulus
    }

    pub fn validate(&self) -> SchemeResult<()> {
        validate_degree("BFV", self.poly_degree)?;
        if self.plain_modulus < 2 || self.plain_modulus > Self::MAX_PLAIN_MODULUS {
            return Err(SchemeError::InvalidParameters(format!(
                "BFV plain_modulus must be within 2..=2^30 (got {})",
                self.plain_modulus
            )));
        }
        Ok(())
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = (self.poly_degree as u64).to_le_bytes().to_vec();
        out.extend(self.plain_modulus.to_le_bytes());
        out
    }
}

impl Default for BfvParams {
    fn default() -> Self {
        Self::new(4096, 786_433)
    }
}

fn validate_degree(scheme: &str, degree: usize) -> SchemeResult<()> {
    if degree < 8 || !degree.is_power_of_two() || degree > (1 << 16) {
        return Err(SchemeError::InvalidParameters(format!(
            "{scheme} poly_degree must be a power of two within 8..=65536 (got {degree})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        PaillierParams::default().validate().unwrap();
        CkksParams::default().validate().unwrap();
        BfvParams::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_power_of_two_degree() {
        assert!(CkksParams::new(1000, 40).validate().is_err());
        assert!(BfvParams::new(96, 257).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_plain_modulus() {
        assert!(BfvParams::new(64, 1).validate().is_err());
        assert!(BfvParams::new(64, (1 << 30) + 1).validate().is_err());
    }

    #[test]
    fn test_ckks_bounds() {
        let params = CkksParams::new(64, 40);
        assert_eq!(params.slots(), 32);
        assert_eq!(params.max_magnitude(), 2f64.powi(21));
    }
}
