pub mod encrypt;
pub mod methods;
pub mod roundtrip;

use anyhow::Result;
use hecrypt_core::{ContextManager, MethodRequest, Orchestrator, SchemeId, SchemesConfig};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

/// Global context passed to all commands
pub struct Context {
    pub json_output: bool,
    pub config_path: Option<PathBuf>,
    pub fast: bool,
    pub verbose: bool,
}

impl Context {
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load(self.config_path.as_deref())?;
        Ok(if self.fast {
            config.with_fast_params()
        } else {
            config
        })
    }

    /// Generate contexts for the schemes `request` can reach.
    /// Keys only live for this process.
    pub fn build_orchestrator(
        &self,
        schemes: &SchemesConfig,
        request: &MethodRequest,
    ) -> Result<Orchestrator> {
        let schemes = restrict(schemes.clone(), request);

        let pb = if !self.json_output {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message("Generating keys...");
            Some(pb)
        } else {
            None
        };

        let contexts = ContextManager::initialize(&schemes);

        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        Ok(Orchestrator::new(Arc::new(contexts?)))
    }
}

/// Skip key generation for schemes the request cannot use
fn restrict(schemes: SchemesConfig, request: &MethodRequest) -> SchemesConfig {
    let tags: &[String] = match request {
        MethodRequest::All => return schemes,
        MethodRequest::Single(tag) => std::slice::from_ref(tag),
        MethodRequest::Many(tags) => tags,
    };
    let ids: Vec<SchemeId> = tags.iter().filter_map(|t| t.parse().ok()).collect();
    schemes.only(&ids)
}
