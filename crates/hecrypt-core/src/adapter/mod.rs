//! Scheme adapters
//!
//! Each adapter maps [`EncodedContent`] onto its provider's plaintext shape and
//! produces the scheme body stored inside a ciphertext envelope. Adapters are
//! stateless; all key material comes from the context passed in.

mod bfv;
mod ckks;
mod paillier;

pub use bfv::BfvAdapter;
pub use ckks::CkksAdapter;
pub use paillier::PaillierAdapter;

use hecrypt_schemes::HomomorphicScheme;

use crate::codec::EncodedContent;
use crate::error::CoreResult;
use crate::scheme::SchemeId;

pub trait SchemeAdapter {
    /// Provider context this adapter drives
    type Scheme: HomomorphicScheme;

    const SCHEME: SchemeId;

    /// Encrypt a whole sequence into a serialized scheme body
    fn encrypt(scheme: &Self::Scheme, content: &EncodedContent) -> CoreResult<Vec<u8>>;

    /// Parse and decrypt a scheme body back into code points
    fn decrypt(scheme: &Self::Scheme, body: &[u8]) -> CoreResult<EncodedContent>;
}
