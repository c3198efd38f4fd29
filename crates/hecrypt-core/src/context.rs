//! Cryptographic context lifecycle
//!
//! Contexts are generated once by [`ContextManager::initialize`] and are
//! read-only afterwards. The manager exposes no mutation, so it can be shared
//! behind an `Arc` and read from any number of threads without locking.

use std::collections::BTreeMap;
use std::time::Instant;

use hecrypt_schemes::{BfvContext, CkksContext, HomomorphicScheme, KeyId, PaillierContext};
use serde::Serialize;

use crate::config::SchemesConfig;
use crate::error::{CoreError, CoreResult};
use crate::scheme::SchemeId;

/// One scheme's parameters and keys
#[derive(Clone)]
pub enum CryptoContext {
    Paillier(PaillierContext),
    Ckks(CkksContext),
    Bfv(BfvContext),
}

impl CryptoContext {
    /// Generate keys for `id` from the configured parameters
    pub fn generate(id: SchemeId, config: &SchemesConfig) -> CoreResult<Self> {
        let context = match id {
            SchemeId::Paillier => {
                CryptoContext::Paillier(PaillierContext::generate(&config.paillier.params())?)
            }
            SchemeId::Ckks => CryptoContext::Ckks(CkksContext::generate(&config.ckks.params())?),
            SchemeId::Bfv => CryptoContext::Bfv(BfvContext::generate(&config.bfv.params())?),
        };

        Ok(if config.can_decrypt(id) {
            context
        } else {
            context.public_only()
        })
    }

    pub fn scheme(&self) -> SchemeId {
        match self {
            CryptoContext::Paillier(_) => SchemeId::Paillier,
            CryptoContext::Ckks(_) => SchemeId::Ckks,
            CryptoContext::Bfv(_) => SchemeId::Bfv,
        }
    }

    pub fn key_id(&self) -> KeyId {
        match self {
            CryptoContext::Paillier(ctx) => ctx.key_id(),
            CryptoContext::Ckks(ctx) => ctx.key_id(),
            CryptoContext::Bfv(ctx) => ctx.key_id(),
        }
    }

    pub fn has_secret_key(&self) -> bool {
        match self {
            CryptoContext::Paillier(ctx) => ctx.has_secret_key(),
            CryptoContext::Ckks(ctx) => ctx.has_secret_key(),
            CryptoContext::Bfv(ctx) => ctx.has_secret_key(),
        }
    }

    pub fn public_only(&self) -> Self {
        match self {
            CryptoContext::Paillier(ctx) => CryptoContext::Paillier(ctx.public_only()),
            CryptoContext::Ckks(ctx) => CryptoContext::Ckks(ctx.public_only()),
            CryptoContext::Bfv(ctx) => CryptoContext::Bfv(ctx.public_only()),
        }
    }

    pub fn info(&self) -> ContextInfo {
        let (name, parameters) = match self {
            CryptoContext::Paillier(ctx) => (
                ctx.name(),
                BTreeMap::from([("modulus_bits", ctx.params().modulus_bits)]),
            ),
            CryptoContext::Ckks(ctx) => (
                ctx.name(),
                BTreeMap::from([
                    ("poly_degree", ctx.params().poly_degree as u64),
                    ("scale_bits", ctx.params().scale_bits as u64),
                    ("slots", ctx.params().slots() as u64),
                ]),
            ),
            CryptoContext::Bfv(ctx) => (
                ctx.name(),
                BTreeMap::from([
                    ("poly_degree", ctx.params().poly_degree as u64),
                    ("plain_modulus", ctx.params().plain_modulus),
                ]),
            ),
        };

        ContextInfo {
            method: self.scheme(),
            name,
            exact: self.scheme().is_exact(),
            can_decrypt: self.has_secret_key(),
            key_id: self.key_id().short(),
            parameters,
        }
    }
}

impl std::fmt::Debug for CryptoContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoContext")
            .field("scheme", &self.scheme())
            .field("key_id", &self.key_id())
            .field("has_secret_key", &self.has_secret_key())
            .finish()
    }
}

/// Public description of a configured context
#[derive(Debug, Clone, Serialize)]
pub struct ContextInfo {
    pub method: SchemeId,
    pub name: &'static str,
    pub exact: bool,
    pub can_decrypt: bool,
    pub key_id: String,
    pub parameters: BTreeMap<&'static str, u64>,
}

/// Owns every configured [`CryptoContext`]
#[derive(Debug, Clone, Default)]
pub struct ContextManager {
    contexts: BTreeMap<SchemeId, CryptoContext>,
}

impl ContextManager {
    /// Generate one context per enabled scheme.
    ///
    /// Fails if any enabled scheme cannot be generated; there is no partially
    /// initialized manager.
    pub fn initialize(config: &SchemesConfig) -> CoreResult<Self> {
        let mut contexts = BTreeMap::new();

        for id in SchemeId::ALL {
            if !config.is_enabled(id) {
                tracing::debug!(scheme = %id, "scheme disabled, skipping key generation");
                continue;
            }

            let start = Instant::now();
            let context = CryptoContext::generate(id, config).map_err(|e| {
                tracing::error!(scheme = %id, error = %e, "key generation failed");
                CoreError::Provider(format!("Failed to initialize {id} context: {e}"))
            })?;

            tracing::info!(
                scheme = %id,
                key_id = %context.key_id(),
                can_decrypt = context.has_secret_key(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "context ready"
            );
            contexts.insert(id, context);
        }

        Ok(Self { contexts })
    }

    /// Build a manager from already generated contexts (one per scheme)
    pub fn from_contexts(contexts: impl IntoIterator<Item = CryptoContext>) -> Self {
        Self {
            contexts: contexts.into_iter().map(|c| (c.scheme(), c)).collect(),
        }
    }

    pub fn get(&self, id: SchemeId) -> CoreResult<&CryptoContext> {
        self.contexts
            .get(&id)
            .ok_or_else(|| CoreError::ContextUnavailable(format!("{id} is not configured")))
    }

    /// Configured schemes, in stable order
    pub fn configured(&self) -> Vec<SchemeId> {
        self.contexts.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn info(&self) -> Vec<ContextInfo> {
        self.contexts.values().map(CryptoContext::info).collect()
    }

    /// Copy of this manager holding public keys only
    pub fn public_only(&self) -> Self {
        Self::from_contexts(self.contexts.values().map(CryptoContext::public_only))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_all_enabled() {
        let manager = ContextManager::initialize(&SchemesConfig::insecure_fast()).unwrap();
        assert_eq!(manager.configured(), SchemeId::ALL.to_vec());
        for id in SchemeId::ALL {
            let ctx = manager.get(id).unwrap();
            assert_eq!(ctx.scheme(), id);
            assert!(ctx.has_secret_key());
        }
    }

    #[test]
    fn test_disabled_scheme_is_unavailable() {
        let config = SchemesConfig::insecure_fast().only(&[SchemeId::Bfv]);
        let manager = ContextManager::initialize(&config).unwrap();
        assert_eq!(manager.configured(), vec![SchemeId::Bfv]);
        assert!(matches!(
            manager.get(SchemeId::Ckks),
            Err(CoreError::ContextUnavailable(_))
        ));
    }

    #[test]
    fn test_decrypt_flag_drops_secret_key() {
        let mut config = SchemesConfig::insecure_fast().only(&[SchemeId::Bfv]);
        config.bfv.decrypt = false;
        let manager = ContextManager::initialize(&config).unwrap();
        assert!(!manager.get(SchemeId::Bfv).unwrap().has_secret_key());
    }

    #[test]
    fn test_invalid_parameters_fail_initialization() {
        let mut config = SchemesConfig::insecure_fast();
        config.ckks.poly_degree = 100;
        assert!(matches!(
            ContextManager::initialize(&config),
            Err(CoreError::Provider(_))
        ));
    }

    #[test]
    fn test_public_only_keeps_key_ids() {
        let manager = ContextManager::initialize(&SchemesConfig::insecure_fast()).unwrap();
        let public = manager.public_only();
        for id in SchemeId::ALL {
            let a = manager.get(id).unwrap();
            let b = public.get(id).unwrap();
            assert_eq!(a.key_id(), b.key_id());
            assert!(!b.has_secret_key());
        }
    }

    #[test]
    fn test_info_reports_parameters() {
        let manager = ContextManager::initialize(&SchemesConfig::insecure_fast()).unwrap();
        let info = manager.info();
        assert_eq!(info.len(), 3);
        let bfv = info.iter().find(|i| i.method == SchemeId::Bfv).unwrap();
        assert_eq!(bfv.parameters["plain_modulus"], 786_433);
        assert!(bfv.exact);
        assert_eq!(bfv.key_id.len(), 16);
    }
}
