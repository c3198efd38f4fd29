//! Probabilistic prime generation for Paillier moduli

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};

/// Miller-Rabin rounds; error probability ≤ 4^-40
pub const MILLER_RABIN_ROUNDS: usize = 40;

const SMALL_PRIMES: [u32; 24] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

pub fn is_probable_prime<R: Rng + CryptoRng>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    if n == &two {
        return true;
    }
    if n.is_even() {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

/// Random prime of exactly `bits` bits with the two top bits set, so the
/// product of two such primes has exactly `2 * bits` bits.
pub fn random_prime<R: Rng + CryptoRng>(bits: u64, rng: &mut R) -> BigUint {
    let top = BigUint::from(3u32) << (bits - 2);
    loop {
        let candidate = rng.gen_biguint(bits) | &top | BigUint::one();
        if is_probable_prime(&candidate, MILLER_RABIN_ROUNDS, rng) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_small_numbers() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let primes: Vec<u32> = (0..200u32)
            .filter(|n| is_probable_prime(&BigUint::from(*n), 10, &mut rng))
            .collect();
        assert_eq!(&primes[..10], &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(primes.len(), 46);
    }

    #[test]
    fn test_known_large_prime_and_composite() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        // 2^61 - 1 (Mersenne prime)
        let m61 = (BigUint::one() << 61u32) - 1u32;
        assert!(is_probable_prime(&m61, 20, &mut rng));
        // 561 = 3·11·17 (Carmichael)
        assert!(!is_probable_prime(&BigUint::from(561u32), 20, &mut rng));
        assert!(!is_probable_prime(&(&m61 * &m61), 20, &mut rng));
    }

    #[test]
    fn test_random_prime_bit_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let p = random_prime(64, &mut rng);
        assert_eq!(p.bits(), 64);
        assert!(p.is_odd());
    }
}
