use crate::config::Config;
use hecrypt_core::{ContextManager, Orchestrator};
use hecrypt_storage::Uploader;
use std::sync::Arc;

/// Shared application state
///
/// Contexts are generated once before the router is built and are read-only
/// afterwards, so cloning the state per request only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub uploader: Arc<Uploader>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Key generation is CPU-bound and can take seconds at production sizes
        let schemes = config.schemes.clone();
        tracing::info!("Generating scheme contexts...");
        let start = std::time::Instant::now();
        let contexts =
            tokio::task::spawn_blocking(move || ContextManager::initialize(&schemes)).await??;
        tracing::info!(
            schemes = ?contexts.configured(),
            "Contexts ready in {:?}",
            start.elapsed()
        );

        if contexts.is_empty() {
            tracing::warn!("No schemes enabled; every encryption request will fail");
        }

        let uploader = Uploader::from_config(config.storage.clone()).await?;

        Ok(Self::from_parts(config, contexts, uploader))
    }

    /// Assemble state from already-built parts (tests, embedding)
    pub fn from_parts(config: &Config, contexts: ContextManager, uploader: Uploader) -> Self {
        Self {
            orchestrator: Arc::new(
                Orchestrator::new(Arc::new(contexts))
                    .with_max_decompressed(config.max_decompressed_bytes()),
            ),
            uploader: Arc::new(uploader),
            config: Arc::new(config.clone()),
        }
    }
}
