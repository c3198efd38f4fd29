//! Batch encryption and decryption across schemes

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use crate::adapter::{BfvAdapter, CkksAdapter, PaillierAdapter, SchemeAdapter};
use crate::codec::{self, EncodedContent};
use crate::context::{ContextManager, CryptoContext};
use crate::envelope::Envelope;
use crate::error::{CoreError, CoreResult, ErrorReport};
use crate::packager;
use crate::scheme::{MethodRequest, SchemeId};

/// One scheme's successful encryption
#[derive(Debug, Clone, Serialize)]
pub struct EncryptionResult {
    pub method: SchemeId,
    /// Envelope bytes (header + scheme body)
    #[serde(skip)]
    pub ciphertext: Vec<u8>,
    /// Base64 of `ciphertext`
    pub encrypted_data: String,
    /// Seconds spent encoding, encrypting and serializing
    #[serde(rename = "encryption_time", serialize_with = "as_secs")]
    pub elapsed: Duration,
    /// Ciphertext size in bytes
    pub size: usize,
}

impl EncryptionResult {
    /// Compressed artifact for persistence
    pub fn package(&self) -> CoreResult<Vec<u8>> {
        packager::compress(self.encrypted_data.as_bytes())
    }
}

fn as_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Per-method entry of a batch result
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MethodOutcome {
    Success(EncryptionResult),
    Failed { error: ErrorReport },
}

impl MethodOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MethodOutcome::Success(_))
    }

    pub fn result(&self) -> Option<&EncryptionResult> {
        match self {
            MethodOutcome::Success(result) => Some(result),
            MethodOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorReport> {
        match self {
            MethodOutcome::Success(_) => None,
            MethodOutcome::Failed { error } => Some(error),
        }
    }
}

/// Results keyed by the requested method tag
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub methods: BTreeMap<String, MethodOutcome>,
}

impl BatchResult {
    pub fn successes(&self) -> impl Iterator<Item = &EncryptionResult> {
        self.methods.values().filter_map(MethodOutcome::result)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ErrorReport)> {
        self.methods
            .iter()
            .filter_map(|(tag, outcome)| outcome.error().map(|e| (tag.as_str(), e)))
    }

    pub fn get(&self, tag: &str) -> Option<&MethodOutcome> {
        self.methods.get(tag)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Drives codec → adapter → provider → packager for every requested scheme
#[derive(Debug, Clone)]
pub struct Orchestrator {
    contexts: Arc<ContextManager>,
    max_decompressed: usize,
}

impl Orchestrator {
    pub fn new(contexts: Arc<ContextManager>) -> Self {
        Self {
            contexts,
            max_decompressed: packager::DEFAULT_MAX_DECOMPRESSED,
        }
    }

    /// Cap on the inflated size of artifacts passed to [`Self::run_decrypt_packaged`]
    pub fn with_max_decompressed(mut self, limit: usize) -> Self {
        self.max_decompressed = limit;
        self
    }

    pub fn contexts(&self) -> &ContextManager {
        &self.contexts
    }

    /// Encrypt `content` under every requested scheme.
    ///
    /// A single unknown or unconfigured method fails the request; inside a
    /// list or `all`, failures are recorded per method and the remaining
    /// schemes still run.
    pub fn run(&self, content: &str, request: &MethodRequest) -> CoreResult<BatchResult> {
        let targets: Vec<(String, CoreResult<SchemeId>)> = match request {
            MethodRequest::All => self
                .contexts
                .configured()
                .into_iter()
                .map(|id| (id.to_string(), Ok(id)))
                .collect(),
            MethodRequest::Single(tag) => {
                let id: SchemeId = tag.parse()?;
                self.contexts.get(id)?;
                vec![(tag.clone(), Ok(id))]
            }
            MethodRequest::Many(tags) => tags
                .iter()
                .map(|tag| (tag.clone(), tag.parse::<SchemeId>()))
                .collect(),
        };

        if targets.is_empty() {
            return Err(CoreError::ContextUnavailable(
                "No schemes are configured".to_string(),
            ));
        }

        let encoded = codec::encode(content);
        let mut batch = BatchResult::default();

        for (tag, id) in targets {
            let outcome = match id.and_then(|id| self.encrypt_one(id, &encoded)) {
                Ok(result) => {
                    tracing::debug!(
                        method = %result.method,
                        size = result.size,
                        elapsed_ms = result.elapsed.as_millis() as u64,
                        "encrypted"
                    );
                    MethodOutcome::Success(result)
                }
                Err(e) => {
                    tracing::warn!(method = %tag, error = %e, "encryption failed");
                    MethodOutcome::Failed { error: e.report() }
                }
            };
            batch.methods.insert(tag, outcome);
        }

        Ok(batch)
    }

    /// Encrypt under one scheme
    pub fn encrypt_one(&self, id: SchemeId, encoded: &EncodedContent) -> CoreResult<EncryptionResult> {
        let context = self.contexts.get(id)?;

        let start = Instant::now();
        let body = encrypt_with(context, encoded)?;
        let ciphertext = Envelope::new(id, context.key_id(), body).to_bytes();
        let encrypted_data = packager::serialize(&ciphertext);
        let elapsed = start.elapsed();

        Ok(EncryptionResult {
            method: id,
            size: ciphertext.len(),
            ciphertext,
            encrypted_data,
            elapsed,
        })
    }

    /// Decrypt a transport-encoded payload produced by [`Orchestrator::run`]
    pub fn run_decrypt(&self, tag: &str, encrypted_output: &str) -> CoreResult<String> {
        let id: SchemeId = tag.parse()?;
        let context = self.contexts.get(id)?;
        if !context.has_secret_key() {
            return Err(CoreError::KeyUnavailable(format!(
                "This process holds only the {id} public key"
            )));
        }

        let envelope = Envelope::from_bytes(&packager::deserialize(encrypted_output)?)?;
        envelope.verify(id, context.key_id())?;

        let start = Instant::now();
        let encoded = decrypt_with(context, &envelope.body)?;
        let text = codec::decode(&encoded)?;
        tracing::debug!(
            method = %id,
            chars = encoded.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "decrypted"
        );

        Ok(text)
    }

    /// Decrypt a persisted (compressed) artifact
    pub fn run_decrypt_packaged(&self, tag: &str, artifact: &[u8]) -> CoreResult<String> {
        let transport = packager::unpackage(artifact, self.max_decompressed)?;
        self.run_decrypt(tag, &transport)
    }
}

fn encrypt_with(context: &CryptoContext, encoded: &EncodedContent) -> CoreResult<Vec<u8>> {
    match context {
        CryptoContext::Paillier(ctx) => PaillierAdapter::encrypt(ctx, encoded),
        CryptoContext::Ckks(ctx) => CkksAdapter::encrypt(ctx, encoded),
        CryptoContext::Bfv(ctx) => BfvAdapter::encrypt(ctx, encoded),
    }
}

fn decrypt_with(context: &CryptoContext, body: &[u8]) -> CoreResult<EncodedContent> {
    match context {
        CryptoContext::Paillier(ctx) => PaillierAdapter::decrypt(ctx, body),
        CryptoContext::Ckks(ctx) => CkksAdapter::decrypt(ctx, body),
        CryptoContext::Bfv(ctx) => BfvAdapter::decrypt(ctx, body),
    }
}
