//! BFV: exact arithmetic on integer vectors modulo t
//!
//! Each block packs N integers into the coefficients of one plaintext
//! polynomial, scaled by Δ = ⌊2^64 / t⌋. Decryption rounds the phase back to
//! the nearest multiple of Δ, so results are exact as long as the noise stays
//! below Δ/2.

use rand::{CryptoRng, Rng, thread_rng};

use crate::ckks::read_blocks;
use crate::error::{SchemeError, SchemeResult};
use crate::key_id::KeyId;
use crate::params::BfvParams;
use crate::rlwe::{self, RlweCiphertext, RlwePublicKey, RlweSecretKey};
use crate::traits::HomomorphicScheme;

/// Encrypted integer vector, split into blocks of N coefficients
#[derive(Clone, Debug, PartialEq)]
pub struct BfvCiphertext {
    len: usize,
    blocks: Vec<RlweCiphertext>,
}

impl BfvCiphertext {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

#[derive(Clone)]
pub struct BfvContext {
    params: BfvParams,
    public: RlwePublicKey,
    secret: Option<RlweSecretKey>,
    key_id: KeyId,
}

impl BfvContext {
    pub fn generate(params: &BfvParams) -> SchemeResult<Self> {
        Self::generate_with_rng(params, &mut thread_rng())
    }

    pub fn generate_with_rng<R: Rng + CryptoRng>(
        params: &BfvParams,
        rng: &mut R,
    ) -> SchemeResult<Self> {
        params.validate()?;

        let (public, secret) = rlwe::generate_keypair(params.poly_degree, rng);
        let key_id = KeyId::derive("bfv", &[&params.to_bytes(), &public.to_bytes()]);

        Ok(Self {
            params: params.clone(),
            public,
            secret: Some(secret),
            key_id,
        })
    }

    pub fn params(&self) -> &BfvParams {
        &self.params
    }

    fn encrypt_block(&self, values: &[u64]) -> RlweCiphertext {
        let delta = self.params.delta();
        let mut message = vec![0u64; self.params.poly_degree];
        for (slot, value) in message.iter_mut().zip(values) {
            *slot = value.wrapping_mul(delta);
        }
        self.public.encrypt(&message, &mut thread_rng())
    }

    /// Round `x / Δ` to the nearest integer mod t
    fn decode_coefficient(&self, x: u64) -> u64 {
        let t = self.params.plain_modulus as u128;
        let scaled = (x as u128 * t + (1u128 << 63)) >> 64;
        (scaled % t) as u64
    }
}

impl HomomorphicScheme for BfvContext {
    type Plaintext = Vec<u64>;
    type Ciphertext = BfvCiphertext;

    fn name(&self) -> &'static str {
        "BFV (exact, packed integers)"
    }

    fn key_id(&self) -> KeyId {
        self.key_id
    }

    fn has_secret_key(&self) -> bool {
        self.secret.is_some()
    }

    fn encrypt(&self, plaintext: &Vec<u64>) -> SchemeResult<BfvCiphertext> {
        let t = self.params.plain_modulus;
        if let Some(value) = plaintext.iter().find(|v| **v >= t) {
            return Err(SchemeError::PlaintextOutOfRange {
                value: value.to_string(),
                bound: t.to_string(),
            });
        }

        let blocks = plaintext
            .chunks(self.params.slots())
            .map(|chunk| self.encrypt_block(chunk))
            .collect();

        Ok(BfvCiphertext {
            len: plaintext.len(),
            blocks,
        })
    }

    fn decrypt(&self, ciphertext: &BfvCiphertext) -> SchemeResult<Vec<u64>> {
        let secret = self.secret.as_ref().ok_or(SchemeError::KeyUnavailable)?;
        let slots = self.params.slots();

        let mut values = Vec::with_capacity(ciphertext.len);
        for (index, block) in ciphertext.blocks.iter().enumerate() {
            let count = (ciphertext.len - index * slots).min(slots);
            values.extend(
                secret
                    .phase(block)
                    .into_iter()
                    .take(count)
                    .map(|x| self.decode_coefficient(x)),
            );
        }

        Ok(values)
    }

    /// Coefficient-wise addition mod t
    fn add(&self, lhs: &BfvCiphertext, rhs: &BfvCiphertext) -> SchemeResult<BfvCiphertext> {
        if lhs.len != rhs.len {
            return Err(SchemeError::OperandMismatch(format!(
                "BFV operands have different lengths: {} vs {}",
                lhs.len, rhs.len
            )));
        }
        Ok(BfvCiphertext {
            len: lhs.len,
            blocks: lhs
                .blocks
                .iter()
                .zip(&rhs.blocks)
                .map(|(a, b)| a.add(b))
                .collect(),
        })
    }

    /// Format: [len (u32)][block_count (u32)][blocks...], each block c0 || c1
    fn serialize(&self, ciphertext: &BfvCiphertext) -> Vec<u8> {
        let block_len = RlweCiphertext::byte_len(self.params.poly_degree);
        let mut out = Vec::with_capacity(8 + ciphertext.blocks.len() * block_len);
        out.extend((ciphertext.len as u32).to_le_bytes());
        out.extend((ciphertext.blocks.len() as u32).to_le_bytes());
        for block in &ciphertext.blocks {
            block.write_bytes(&mut out);
        }
        out
    }

    fn deserialize(&self, bytes: &[u8]) -> SchemeResult<BfvCiphertext> {
        let (len, blocks) =
            read_blocks(bytes, self.params.slots(), self.params.poly_degree, "BFV")?;
        Ok(BfvCiphertext { len, blocks })
    }

    fn public_only(&self) -> Self {
        Self {
            secret: None,
            ..self.clone()
        }
    }
}
