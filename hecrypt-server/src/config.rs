use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use hecrypt_core::SchemesConfig;
use hecrypt_storage::StorageConfig;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "hecrypt-server.toml";
pub const ENV_PREFIX: &str = "HECRYPT_";

/// Decompressed artifacts may be at most this many times `max_upload_bytes`
pub const DECOMPRESSION_RATIO: usize = 4;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request body limit for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default)]
    pub schemes: SchemesConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    5000
}
fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            schemes: SchemesConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// `hecrypt-server.toml` overlaid with `HECRYPT_*` variables.
    /// Nested keys use `__`, e.g. `HECRYPT_STORAGE__BACKEND=memory`.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Cap on the inflated size of an uploaded artifact
    pub fn max_decompressed_bytes(&self) -> usize {
        self.max_upload_bytes.saturating_mul(DECOMPRESSION_RATIO)
    }

    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::extract(Self::figment())?)
    }

    /// Extract from `figment`, then fill the storage token from the environment
    pub fn extract(figment: Figment) -> Result<Self, figment::Error> {
        let mut config: Config = figment.extract()?;
        config.storage = config.storage.with_env_token();
        Ok(config)
    }
}
