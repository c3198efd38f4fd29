//! Arithmetic in Z_{2^64}[X]/(X^N + 1)
//!
//! Coefficients live in native u64 and every operation wraps, so the
//! ciphertext modulus is 2^64 without any explicit reduction step. Products are
//! only ever taken between a full-range polynomial and a small one (ternary
//! secret/ephemeral or centered-binomial noise), which keeps schoolbook
//! multiplication at O(N · nonzero) with no overflow concerns.

use rand::{CryptoRng, Rng, RngCore};

/// Centered-binomial noise parameter: coefficients fall in [-ETA, ETA]
pub const NOISE_ETA: u32 = 3;

/// Full-range polynomial
pub type Poly = Vec<u64>;

/// Polynomial with small signed coefficients
pub type SmallPoly = Vec<i8>;

pub fn add(lhs: &[u64], rhs: &[u64]) -> Poly {
    lhs.iter().zip(rhs).map(|(a, b)| a.wrapping_add(*b)).collect()
}

pub fn add_small(lhs: &[u64], rhs: &[i8]) -> Poly {
    lhs.iter()
        .zip(rhs)
        .map(|(a, b)| a.wrapping_add(*b as i64 as u64))
        .collect()
}

pub fn neg(poly: &[u64]) -> Poly {
    poly.iter().map(|c| c.wrapping_neg()).collect()
}

/// Negacyclic product `a · s` where `s` has small coefficients
pub fn mul_small(a: &[u64], s: &[i8]) -> Poly {
    let n = a.len();
    debug_assert_eq!(n, s.len());
    let mut out = vec![0u64; n];

    for (j, &sj) in s.iter().enumerate() {
        if sj == 0 {
            continue;
        }
        let factor = sj as i64 as u64;
        for (i, &ai) in a.iter().enumerate() {
            let term = ai.wrapping_mul(factor);
            let k = i + j;
            // X^N = -1
            if k < n {
                out[k] = out[k].wrapping_add(term);
            } else {
                out[k - n] = out[k - n].wrapping_sub(term);
            }
        }
    }

    out
}

pub fn sample_uniform<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> Poly {
    (0..n).map(|_| rng.next_u64()).collect()
}

pub fn sample_ternary<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> SmallPoly {
    (0..n).map(|_| rng.gen_range(-1i8..=1)).collect()
}

pub fn sample_noise<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> SmallPoly {
    let mask = (1u32 << NOISE_ETA) - 1;
    (0..n)
        .map(|_| {
            let bits = rng.next_u32();
            let pos = (bits & mask).count_ones() as i8;
            let neg = ((bits >> NOISE_ETA) & mask).count_ones() as i8;
            pos - neg
        })
        .collect()
}

pub fn to_bytes(poly: &[u64], out: &mut Vec<u8>) {
    for coeff in poly {
        out.extend(coeff.to_le_bytes());
    }
}

pub fn from_bytes(bytes: &[u8]) -> Poly {
    bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_mul_small_by_one_is_identity() {
        let a: Vec<u64> = (1..=8).collect();
        let mut one = vec![0i8; 8];
        one[0] = 1;
        assert_eq!(mul_small(&a, &one), a);
    }

    #[test]
    fn test_mul_by_x_is_negacyclic_shift() {
        let a: Vec<u64> = vec![1, 2, 3, 4];
        let x = vec![0i8, 1, 0, 0];
        let shifted = mul_small(&a, &x);
        assert_eq!(shifted, vec![4u64.wrapping_neg(), 1, 2, 3]);
    }

    #[test]
    fn test_mul_by_minus_one() {
        let a: Vec<u64> = vec![5, 0, 7, u64::MAX];
        let minus_one = vec![-1i8, 0, 0, 0];
        assert_eq!(mul_small(&a, &minus_one), neg(&a));
    }

    #[test]
    fn test_noise_is_bounded() {
        let noise = sample_noise(4096, &mut OsRng);
        let eta = NOISE_ETA as i8;
        assert!(noise.iter().all(|c| (-eta..=eta).contains(c)));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let poly = sample_uniform(16, &mut OsRng);
        let mut bytes = Vec::new();
        to_bytes(&poly, &mut bytes);
        assert_eq!(bytes.len(), 16 * 8);
        assert_eq!(from_bytes(&bytes), poly);
    }
}
