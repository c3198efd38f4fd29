//! Paillier: additively homomorphic public-key encryption over Z_n
//!
//! Uses the g = n + 1 simplification, so encryption is
//! `c = (1 + m·n) · r^n mod n²` and decryption is
//! `m = L(c^λ mod n²) · μ mod n` with `L(x) = (x - 1) / n`.

pub mod prime;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng, thread_rng};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{SchemeError, SchemeResult};
use crate::key_id::KeyId;
use crate::params::PaillierParams;
use crate::traits::HomomorphicScheme;

/// Public key: the modulus n (n² cached)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaillierPublicKey {
    n: BigUint,
    n_squared: BigUint,
}

impl PaillierPublicKey {
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Fixed byte width of every serialized ciphertext
    pub fn ciphertext_len(&self) -> usize {
        self.n_squared.bits().div_ceil(8) as usize
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.n.to_bytes_be()
    }
}

/// Secret key: λ = lcm(p-1, q-1) and μ = λ⁻¹ mod n (zeroized on drop)
#[derive(Clone)]
pub struct PaillierSecretKey {
    lambda: BigUint,
    mu: BigUint,
}

// BigUint has no Zeroize impl and no mutable access to its limbs
impl Zeroize for PaillierSecretKey {
    fn zeroize(&mut self) {
        wipe(&mut self.lambda);
        wipe(&mut self.mu);
    }
}

impl Drop for PaillierSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for PaillierSecretKey {}

/// Overwrite every limb of `value` in place, leaving zero.
///
/// `top` has the same limb count as `value`, so the AND rewrites all limbs
/// below the highest one with zeros and the XOR then clears the last bit.
fn wipe(value: &mut BigUint) {
    let bits = value.bits();
    if bits == 0 {
        return;
    }
    let top = BigUint::one() << (bits - 1);
    *value &= &top;
    *value ^= &top;
}

/// One encrypted integer, an element of Z*_{n²}
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaillierCiphertext(BigUint);

impl PaillierCiphertext {
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

#[derive(Clone)]
pub struct PaillierContext {
    params: PaillierParams,
    public: PaillierPublicKey,
    secret: Option<PaillierSecretKey>,
    key_id: KeyId,
}

impl PaillierContext {
    pub fn generate(params: &PaillierParams) -> SchemeResult<Self> {
        Self::generate_with_rng(params, &mut thread_rng())
    }

    pub fn generate_with_rng<R: Rng + CryptoRng>(
        params: &PaillierParams,
        rng: &mut R,
    ) -> SchemeResult<Self> {
        params.validate()?;
        let prime_bits = params.modulus_bits / 2;

        let (n, lambda) = loop {
            let p = prime::random_prime(prime_bits, rng);
            let q = prime::random_prime(prime_bits, rng);
            if p == q {
                continue;
            }
            let n = &p * &q;
            let phi = (&p - 1u32) * (&q - 1u32);
            if !n.gcd(&phi).is_one() {
                continue;
            }
            let lambda = (&p - 1u32).lcm(&(&q - 1u32));
            break (n, lambda);
        };

        let mu = mod_inverse(&lambda, &n).ok_or_else(|| {
            SchemeError::KeyGeneration("λ is not invertible modulo n".to_string())
        })?;

        let public = PaillierPublicKey {
            n_squared: &n * &n,
            n,
        };
        let key_id = KeyId::derive("paillier", &[&params.to_bytes(), &public.to_bytes()]);

        Ok(Self {
            params: params.clone(),
            public,
            secret: Some(PaillierSecretKey { lambda, mu }),
            key_id,
        })
    }

    pub fn params(&self) -> &PaillierParams {
        &self.params
    }

    pub fn public_key(&self) -> &PaillierPublicKey {
        &self.public
    }

    /// Encrypt with caller-supplied randomness
    pub fn encrypt_with_rng<R: Rng + CryptoRng>(
        &self,
        plaintext: &BigUint,
        rng: &mut R,
    ) -> SchemeResult<PaillierCiphertext> {
        let n = &self.public.n;
        let n_squared = &self.public.n_squared;

        if plaintext >= n {
            return Err(SchemeError::PlaintextOutOfRange {
                value: plaintext.to_string(),
                bound: n.to_string(),
            });
        }

        let r = loop {
            let r = rng.gen_biguint_range(&BigUint::one(), n);
            if r.gcd(n).is_one() {
                break r;
            }
        };

        let gm = (BigUint::one() + plaintext * n) % n_squared;
        let rn = r.modpow(n, n_squared);
        Ok(PaillierCiphertext((gm * rn) % n_squared))
    }

    fn check_ciphertext(&self, value: &BigUint) -> SchemeResult<()> {
        if value.is_zero() || value >= &self.public.n_squared {
            return Err(SchemeError::Deserialization(
                "Paillier ciphertext is not an element of Z*_{n²}".to_string(),
            ));
        }
        Ok(())
    }
}

impl HomomorphicScheme for PaillierContext {
    type Plaintext = BigUint;
    type Ciphertext = PaillierCiphertext;

    fn name(&self) -> &'static str {
        "Paillier (additive, per-value)"
    }

    fn key_id(&self) -> KeyId {
        self.key_id
    }

    fn has_secret_key(&self) -> bool {
        self.secret.is_some()
    }

    fn encrypt(&self, plaintext: &BigUint) -> SchemeResult<PaillierCiphertext> {
        self.encrypt_with_rng(plaintext, &mut thread_rng())
    }

    fn decrypt(&self, ciphertext: &PaillierCiphertext) -> SchemeResult<BigUint> {
        let secret = self.secret.as_ref().ok_or(SchemeError::KeyUnavailable)?;
        self.check_ciphertext(&ciphertext.0)
            .map_err(|e| SchemeError::Decryption(e.to_string()))?;

        let n = &self.public.n;
        let u = ciphertext.0.modpow(&secret.lambda, &self.public.n_squared);
        let l = (u - 1u32) / n;
        Ok((l * &secret.mu) % n)
    }

    fn add(
        &self,
        lhs: &PaillierCiphertext,
        rhs: &PaillierCiphertext,
    ) -> SchemeResult<PaillierCiphertext> {
        Ok(PaillierCiphertext(
            (&lhs.0 * &rhs.0) % &self.public.n_squared,
        ))
    }

    /// Big-endian, left-padded to `ciphertext_len()` bytes
    fn serialize(&self, ciphertext: &PaillierCiphertext) -> Vec<u8> {
        let width = self.public.ciphertext_len();
        let raw = ciphertext.0.to_bytes_be();
        let mut out = vec![0u8; width.saturating_sub(raw.len())];
        out.extend(raw);
        out
    }

    fn deserialize(&self, bytes: &[u8]) -> SchemeResult<PaillierCiphertext> {
        let width = self.public.ciphertext_len();
        if bytes.len() != width {
            return Err(SchemeError::Deserialization(format!(
                "Invalid Paillier ciphertext length: {} != {}",
                bytes.len(),
                width
            )));
        }
        let value = BigUint::from_bytes_be(bytes);
        self.check_ciphertext(&value)?;
        Ok(PaillierCiphertext(value))
    }

    fn public_only(&self) -> Self {
        Self {
            secret: None,
            ..self.clone()
        }
    }
}

/// a⁻¹ mod m via the extended Euclidean algorithm
fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a = BigInt::from(a.clone());
    let m = BigInt::from(m.clone());
    let egcd = a.extended_gcd(&m);
    if !egcd.gcd.is_one() {
        return None;
    }
    egcd.x.mod_floor(&m).to_biguint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn small_context() -> PaillierContext {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        PaillierContext::generate_with_rng(&PaillierParams::new(128), &mut rng).unwrap()
    }

    #[test]
    fn test_modulus_has_requested_bits() {
        let ctx = small_context();
        assert_eq!(ctx.public_key().modulus().bits(), 128);
        assert_eq!(ctx.public_key().ciphertext_len(), 32);
    }

    #[test]
    fn test_encrypt_decrypt() {
        let ctx = small_context();
        for m in [0u32, 1, 65, 66, 0x10FFFF] {
            let m = BigUint::from(m);
            let ct = ctx.encrypt(&m).unwrap();
            assert_eq!(ctx.decrypt(&ct).unwrap(), m);
        }
    }

    #[test]
    fn test_encryption_is_randomized() {
        let ctx = small_context();
        let m = BigUint::from(65u32);
        assert_ne!(ctx.encrypt(&m).unwrap(), ctx.encrypt(&m).unwrap());
    }

    #[test]
    fn test_rejects_plaintext_at_or_above_modulus() {
        let ctx = small_context();
        let n = ctx.public_key().modulus().clone();
        assert!(matches!(
            ctx.encrypt(&n),
            Err(SchemeError::PlaintextOutOfRange { .. })
        ));
    }

    #[test]
    fn test_homomorphic_addition() {
        let ctx = small_context();
        let a = ctx.encrypt(&BigUint::from(1000u32)).unwrap();
        let b = ctx.encrypt(&BigUint::from(234u32)).unwrap();
        let sum = ctx.add(&a, &b).unwrap();
        assert_eq!(ctx.decrypt(&sum).unwrap(), BigUint::from(1234u32));
    }

    #[test]
    fn test_serialize_is_fixed_width() {
        let ctx = small_context();
        let ct = ctx.encrypt(&BigUint::from(7u32)).unwrap();
        let bytes = ctx.serialize(&ct);
        assert_eq!(bytes.len(), ctx.public_key().ciphertext_len());
        assert_eq!(ctx.deserialize(&bytes).unwrap(), ct);
    }

    #[test]
    fn test_deserialize_rejects_zero_and_wrong_length() {
        let ctx = small_context();
        let width = ctx.public_key().ciphertext_len();
        assert!(ctx.deserialize(&vec![0u8; width]).is_err());
        assert!(ctx.deserialize(&vec![1u8; width + 1]).is_err());
        assert!(ctx.deserialize(&vec![0xffu8; width]).is_err());
    }

    #[test]
    fn test_public_only() {
        let ctx = small_context();
        let public = ctx.public_only();
        let ct = public.encrypt(&BigUint::from(9u32)).unwrap();
        assert!(matches!(public.decrypt(&ct), Err(SchemeError::KeyUnavailable)));
        assert_eq!(ctx.decrypt(&ct).unwrap(), BigUint::from(9u32));
    }

    #[test]
    fn test_secret_key_zeroize_clears_both_fields() {
        let ctx = small_context();
        let mut secret = ctx.secret.clone().unwrap();
        assert!(!secret.lambda.is_zero());
        assert!(!secret.mu.is_zero());

        secret.zeroize();
        assert!(secret.lambda.is_zero());
        assert!(secret.mu.is_zero());
    }

    #[test]
    fn test_wipe_clears_values_of_any_width() {
        let mut zero = BigUint::zero();
        wipe(&mut zero);
        assert!(zero.is_zero());

        let mut small = BigUint::from(0b1011u32);
        wipe(&mut small);
        assert!(small.is_zero());

        let mut wide = (BigUint::one() << 300u32) - 1u32;
        wipe(&mut wide);
        assert!(wide.is_zero());
    }

    #[test]
    fn test_mod_inverse() {
        let inv = mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32)).unwrap();
        assert_eq!(inv, BigUint::from(4u32));
        assert!(mod_inverse(&BigUint::from(4u32), &BigUint::from(8u32)).is_none());
    }
}
