//! # hecrypt-core: multi-scheme homomorphic encryption orchestration
//!
//! Turns text into ciphertexts under Paillier, CKKS and BFV through one
//! request/response model:
//!
//! ```text
//! text ─► codec::encode ─► adapter (per scheme) ─► provider.encrypt
//!      ─► Envelope ─► packager (base64, optional zstd) ─► BatchResult
//! ```
//!
//! Decryption runs the same pipeline backwards. Paillier and BFV round-trip
//! exactly; CKKS is approximate and its adapter rounds every slot to the
//! nearest integer before the codec sees it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hecrypt_core::{ContextManager, MethodRequest, Orchestrator, SchemesConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let contexts = ContextManager::initialize(&SchemesConfig::insecure_fast())?;
//! let orchestrator = Orchestrator::new(Arc::new(contexts));
//!
//! let batch = orchestrator.run("AB", &MethodRequest::All)?;
//! assert_eq!(batch.len(), 3);
//!
//! let bfv = batch.get("bfv").and_then(|o| o.result()).ok_or("bfv failed")?;
//! assert_eq!(orchestrator.run_decrypt("bfv", &bfv.encrypted_data)?, "AB");
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! Per-scheme failures inside a batch are captured as [`MethodOutcome::Failed`]
//! and never abort the other schemes. Every error carries an [`ErrorKind`] and
//! can be rendered as an [`ErrorReport`].

pub mod adapter;
pub mod codec;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod orchestrator;
pub mod packager;
pub mod scheme;

pub use codec::EncodedContent;
pub use config::{BfvConfig, CkksConfig, PaillierConfig, SchemesConfig};
pub use context::{ContextInfo, ContextManager, CryptoContext};
pub use envelope::Envelope;
pub use error::{CoreError, CoreResult, ErrorKind, ErrorReport};
pub use orchestrator::{BatchResult, EncryptionResult, MethodOutcome, Orchestrator};
pub use scheme::{MethodRequest, SchemeId};
