//! CKKS: approximate arithmetic over packed real vectors
//!
//! Values are placed in the N/2 slots of the canonical embedding, i.e. a block
//! polynomial m satisfies m(ξ^(5^j)) ≈ z_j for the primitive 2N-th root ξ.
//! Real inputs only need the cosine half of the transform:
//!
//! ```text
//! encode:  m_i = (2/N) · Σ_j z_j · cos(π · 5^j · i / N)
//! decode:  z_j =         Σ_i m_i · cos(π · 5^j · i / N)
//! ```
//!
//! `5^j · i` is reduced mod 2N so both directions index one cosine table.
//! Decrypted values carry a small error; callers must not expect bit-exact
//! output.

use rand::{CryptoRng, Rng, thread_rng};

use crate::error::{SchemeError, SchemeResult};
use crate::key_id::KeyId;
use crate::params::CkksParams;
use crate::rlwe::{self, RlweCiphertext, RlwePublicKey, RlweSecretKey};
use crate::traits::HomomorphicScheme;

/// Encrypted real vector, split into blocks of N/2 slots
#[derive(Clone, Debug, PartialEq)]
pub struct CkksCiphertext {
    len: usize,
    blocks: Vec<RlweCiphertext>,
}

impl CkksCiphertext {
    /// Number of encrypted values
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

/// Precomputed slot transform for one ring degree
#[derive(Clone, Debug)]
struct SlotEncoder {
    degree: usize,
    /// cos(π·k/N) for k in 0..2N
    cos_table: Vec<f64>,
    /// 5^j mod 2N for j in 0..N/2
    rotation_group: Vec<usize>,
}

impl SlotEncoder {
    fn new(degree: usize) -> Self {
        let two_n = 2 * degree;
        let cos_table = (0..two_n)
            .map(|k| (std::f64::consts::PI * k as f64 / degree as f64).cos())
            .collect();

        let mut rotation_group = Vec::with_capacity(degree / 2);
        let mut power = 1usize;
        for _ in 0..degree / 2 {
            rotation_group.push(power);
            power = (power * 5) % two_n;
        }

        Self {
            degree,
            cos_table,
            rotation_group,
        }
    }

    fn angle_index(&self, slot: usize, coeff: usize) -> usize {
        (self.rotation_group[slot] * coeff) % (2 * self.degree)
    }

    /// Real slot values → real coefficients (unscaled)
    fn encode(&self, values: &[f64]) -> Vec<f64> {
        let norm = 2.0 / self.degree as f64;
        (0..self.degree)
            .map(|i| {
                let sum: f64 = values
                    .iter()
                    .enumerate()
                    .map(|(j, z)| z * self.cos_table[self.angle_index(j, i)])
                    .sum();
                sum * norm
            })
            .collect()
    }

    /// Real coefficients → first `count` slot values
    fn decode(&self, coeffs: &[f64], count: usize) -> Vec<f64> {
        (0..count)
            .map(|j| {
                coeffs
                    .iter()
                    .enumerate()
                    .map(|(i, m)| m * self.cos_table[self.angle_index(j, i)])
                    .sum()
            })
            .collect()
    }
}

/// CKKS context: parameters, public key and optionally the secret key
#[derive(Clone)]
pub struct CkksContext {
    params: CkksParams,
    public: RlwePublicKey,
    secret: Option<RlweSecretKey>,
    encoder: SlotEncoder,
    key_id: KeyId,
}

impl CkksContext {
    pub fn generate(params: &CkksParams) -> SchemeResult<Self> {
        Self::generate_with_rng(params, &mut thread_rng())
    }

    pub fn generate_with_rng<R: Rng + CryptoRng>(
        params: &CkksParams,
        rng: &mut R,
    ) -> SchemeResult<Self> {
        params.validate()?;

        let (public, secret) = rlwe::generate_keypair(params.poly_degree, rng);
        let key_id = KeyId::derive("ckks", &[&params.to_bytes(), &public.to_bytes()]);

        Ok(Self {
            params: params.clone(),
            public,
            secret: Some(secret),
            encoder: SlotEncoder::new(params.poly_degree),
            key_id,
        })
    }

    pub fn params(&self) -> &CkksParams {
        &self.params
    }

    fn check_value(&self, value: f64) -> SchemeResult<()> {
        let bound = self.params.max_magnitude();
        if !value.is_finite() || value.abs() >= bound {
            return Err(SchemeError::PlaintextOutOfRange {
                value: value.to_string(),
                bound: bound.to_string(),
            });
        }
        Ok(())
    }

    fn encrypt_block(&self, values: &[f64]) -> RlweCiphertext {
        let scale = self.params.scale();
        let message: Vec<u64> = self
            .encoder
            .encode(values)
            .into_iter()
            .map(|m| (m * scale).round() as i64 as u64)
            .collect();
        self.public.encrypt(&message, &mut thread_rng())
    }

    fn block_byte_len(&self) -> usize {
        RlweCiphertext::byte_len(self.params.poly_degree)
    }
}

impl HomomorphicScheme for CkksContext {
    type Plaintext = Vec<f64>;
    type Ciphertext = CkksCiphertext;

    fn name(&self) -> &'static str {
        "CKKS (approximate, packed reals)"
    }

    fn key_id(&self) -> KeyId {
        self.key_id
    }

    fn has_secret_key(&self) -> bool {
        self.secret.is_some()
    }

    fn encrypt(&self, plaintext: &Vec<f64>) -> SchemeResult<CkksCiphertext> {
        for value in plaintext {
            self.check_value(*value)?;
        }

        let blocks = plaintext
            .chunks(self.params.slots())
            .map(|chunk| self.encrypt_block(chunk))
            .collect();

        Ok(CkksCiphertext {
            len: plaintext.len(),
            blocks,
        })
    }

    fn decrypt(&self, ciphertext: &CkksCiphertext) -> SchemeResult<Vec<f64>> {
        let secret = self.secret.as_ref().ok_or(SchemeError::KeyUnavailable)?;
        let scale = self.params.scale();
        let slots = self.params.slots();

        let mut values = Vec::with_capacity(ciphertext.len);
        for (index, block) in ciphertext.blocks.iter().enumerate() {
            let count = (ciphertext.len - index * slots).min(slots);
            let coeffs: Vec<f64> = secret
                .phase(block)
                .into_iter()
                .map(|c| c as i64 as f64 / scale)
                .collect();
            values.extend(self.encoder.decode(&coeffs, count));
        }

        Ok(values)
    }

    fn add(&self, lhs: &CkksCiphertext, rhs: &CkksCiphertext) -> SchemeResult<CkksCiphertext> {
        if lhs.len != rhs.len {
            return Err(SchemeError::OperandMismatch(format!(
                "CKKS operands have different lengths: {} vs {}",
                lhs.len, rhs.len
            )));
        }
        Ok(CkksCiphertext {
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
    fn serialize(&self, ciphertext: &CkksCiphertext) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + ciphertext.blocks.len() * self.block_byte_len());
        out.extend((ciphertext.len as u32).to_le_bytes());
        out.extend((ciphertext.blocks.len() as u32).to_le_bytes());
        for block in &ciphertext.blocks {
            block.write_bytes(&mut out);
        }
        out
    }

    fn deserialize(&self, bytes: &[u8]) -> SchemeResult<CkksCiphertext> {
        let (len, blocks) = read_blocks(
            bytes,
            self.params.slots(),
            self.params.poly_degree,
            "CKKS",
        )?;
        Ok(CkksCiphertext { len, blocks })
    }

    fn public_only(&self) -> Self {
        Self {
            secret: None,
            ..self.clone()
        }
    }
}

/// Shared block-list parser for the packed RLWE schemes
pub(crate) fn read_blocks(
    bytes: &[u8],
    slots: usize,
    degree: usize,
    scheme: &str,
) -> SchemeResult<(usize, Vec<RlweCiphertext>)> {
    if bytes.len() < 8 {
        return Err(SchemeError::Deserialization(format!(
            "{scheme} ciphertext too short"
        )));
    }

    let len = read_u32(&bytes[0..4])? as usize;
    let block_count = read_u32(&bytes[4..8])? as usize;

    if block_count != len.div_ceil(slots) {
        return Err(SchemeError::Deserialization(format!(
            "{scheme} ciphertext holds {len} values in {block_count} blocks of {slots} slots"
        )));
    }

    let block_len = RlweCiphertext::byte_len(degree);
    let body = &bytes[8..];
    if body.len() != block_count * block_len {
        return Err(SchemeError::Deserialization(format!(
            "Invalid {scheme} ciphertext length: {} != {}",
            body.len(),
            block_count * block_len
        )));
    }

    let blocks = body
        .chunks_exact(block_len)
        .map(|chunk| RlweCiphertext::from_bytes(chunk, degree))
        .collect::<SchemeResult<Vec<_>>>()?;

    Ok((len, blocks))
}

fn read_u32(bytes: &[u8]) -> SchemeResult<u32> {
    Ok(u32::from_le_bytes(bytes.try_into().map_err(|_| {
        SchemeError::Deserialization("Invalid length bytes".to_string())
    })?))
}
