//! Homomorphic cryptosystem providers
//!
//! Three schemes behind one [`HomomorphicScheme`] trait:
//!
//! | Scheme   | Plaintext  | Packing                 | Exact |
//! |----------|------------|-------------------------|-------|
//! | Paillier | `BigUint`  | one value per ciphertext| yes   |
//! | CKKS     | `Vec<f64>` | N/2 slots per block     | no    |
//! | BFV      | `Vec<u64>` | N coefficients per block| yes   |
//!
//! All three are additively homomorphic. CKKS and BFV share a Ring-LWE core
//! over Z_{2^64}[X]/(X^N + 1) with native wrapping arithmetic; Paillier uses
//! `num-bigint`.
//!
//! A context owns one parameter set and one key pair and never changes after
//! generation. [`HomomorphicScheme::public_only`] drops the secret key, after
//! which `decrypt` fails with [`SchemeError::KeyUnavailable`].
//!
//! # Example
//!
//! ```ignore
//! use hecrypt_schemes::{BfvContext, BfvParams, HomomorphicScheme};
//!
//! let ctx = BfvContext::generate(&BfvParams::default())?;
//! let ct = ctx.encrypt(&vec![65, 66])?;
//! assert_eq!(ctx.decrypt(&ct)?, vec![65, 66]);
//! ```

pub mod bfv;
pub mod ckks;
pub mod error;
pub mod key_id;
pub mod paillier;
pub mod params;
pub mod ring;
pub mod rlwe;
pub mod traits;

pub use bfv::{BfvCiphertext, BfvContext};
pub use ckks::{CkksCiphertext, CkksContext};
pub use error::{SchemeError, SchemeResult};
pub use key_id::KeyId;
pub use paillier::{PaillierCiphertext, PaillierContext, PaillierPublicKey};
pub use params::{BfvParams, CkksParams, PaillierParams};
pub use traits::HomomorphicScheme;

pub use num_bigint::BigUint;
