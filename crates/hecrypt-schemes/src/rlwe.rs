//! Ring-LWE public-key encryption shared by CKKS and BFV
//!
//! Both schemes differ only in how plaintexts are mapped onto ring elements;
//! key generation, encryption and the decryption phase are identical.

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{SchemeError, SchemeResult};
use crate::ring::{self, Poly, SmallPoly};

/// Ternary secret key (zeroized on drop)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RlweSecretKey {
    s: SmallPoly,
}

/// Public key (b, a) with b = -(a·s) + e
#[derive(Clone, Debug)]
pub struct RlwePublicKey {
    b: Poly,
    a: Poly,
}

/// One ring ciphertext (c0, c1) with c0 + c1·s = m + noise
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RlweCiphertext {
    pub(crate) c0: Poly,
    pub(crate) c1: Poly,
}

pub fn generate_keypair<R: RngCore + CryptoRng>(
    degree: usize,
    rng: &mut R,
) -> (RlwePublicKey, RlweSecretKey) {
    let s = ring::sample_ternary(degree, rng);
    let a = ring::sample_uniform(degree, rng);
    let e = ring::sample_noise(degree, rng);

    let b = ring::add_small(&ring::neg(&ring::mul_small(&a, &s)), &e);

    (RlwePublicKey { b, a }, RlweSecretKey { s })
}

impl RlwePublicKey {
    pub fn degree(&self) -> usize {
        self.a.len()
    }

    /// Encrypt an already-encoded ring element
    pub fn encrypt<R: RngCore + CryptoRng>(&self, message: &[u64], rng: &mut R) -> RlweCiphertext {
        let n = self.degree();
        let u = ring::sample_ternary(n, rng);
        let e1 = ring::sample_noise(n, rng);
        let e2 = ring::sample_noise(n, rng);

        let c0 = ring::add(
            &ring::add_small(&ring::mul_small(&self.b, &u), &e1),
            message,
        );
        let c1 = ring::add_small(&ring::mul_small(&self.a, &u), &e2);

        RlweCiphertext { c0, c1 }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.degree() * 16);
        ring::to_bytes(&self.b, &mut out);
        ring::to_bytes(&self.a, &mut out);
        out
    }
}

impl RlweSecretKey {
    /// Decryption phase c0 + c1·s, i.e. the encoded message plus noise
    pub fn phase(&self, ciphertext: &RlweCiphertext) -> Poly {
        ring::add(&ciphertext.c0, &ring::mul_small(&ciphertext.c1, &self.s))
    }
}

impl RlweCiphertext {
    pub fn add(&self, other: &Self) -> Self {
        Self {
            c0: ring::add(&self.c0, &other.c0),
            c1: ring::add(&self.c1, &other.c1),
        }
    }

    /// Serialized size for ring degree `degree`
    pub fn byte_len(degree: usize) -> usize {
        degree * 16
    }

    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        ring::to_bytes(&self.c0, out);
        ring::to_bytes(&self.c1, out);
    }

    pub fn from_bytes(bytes: &[u8], degree: usize) -> SchemeResult<Self> {
        if bytes.len() != Self::byte_len(degree) {
            return Err(SchemeError::Deserialization(format!(
                "Invalid ring ciphertext length: {} != {}",
                bytes.len(),
                Self::byte_len(degree)
            )));
        }
        let (c0, c1) = bytes.split_at(degree * 8);
        Ok(Self {
            c0: ring::from_bytes(c0),
            c1: ring::from_bytes(c1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_phase_recovers_message_up_to_noise() {
        let (pk, sk) = generate_keypair(64, &mut OsRng);
        let message: Vec<u64> = (0..64).map(|i| (i as u64) << 40).collect();

        let ct = pk.encrypt(&message, &mut OsRng);
        let phase = sk.phase(&ct);

        for (m, p) in message.iter().zip(&phase) {
            let diff = p.wrapping_sub(*m) as i64;
            assert!(diff.abs() < 1 << 16, "noise too large: {diff}");
        }
    }

    #[test]
    fn test_ciphertext_bytes_roundtrip() {
        let (pk, _) = generate_keypair(16, &mut OsRng);
        let ct = pk.encrypt(&[0u64; 16], &mut OsRng);

        let mut bytes = Vec::new();
        ct.write_bytes(&mut bytes);
        assert_eq!(bytes.len(), RlweCiphertext::byte_len(16));
        assert_eq!(RlweCiphertext::from_bytes(&bytes, 16).unwrap(), ct);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        assert!(RlweCiphertext::from_bytes(&[0u8; 10], 16).is_err());
    }
}
