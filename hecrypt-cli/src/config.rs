// Config file handling

use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use hecrypt_core::SchemesConfig;
use hecrypt_storage::StorageConfig;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "hecrypt.toml";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub schemes: SchemesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// `path` (or `./hecrypt.toml`) overlaid with `HECRYPT_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(Self::extract(Self::figment(path))?)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed("HECRYPT_").split("__"))
    }

    pub fn extract(figment: Figment) -> Result<Self, figment::Error> {
        let mut config: Config = figment.extract()?;
        config.storage = config.storage.with_env_token();
        Ok(config)
    }

    /// Swap in the small test parameter sets, keeping enabled/decrypt flags
    pub fn with_fast_params(mut self) -> Self {
        let fast = SchemesConfig::insecure_fast();
        self.schemes.paillier.modulus_bits = fast.paillier.modulus_bits;
        self.schemes.ckks.poly_degree = fast.ckks.poly_degree;
        self.schemes.bfv.poly_degree = fast.bfv.poly_degree;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                    [schemes.bfv]
                    plain_modulus = 65537

                    [storage]
                    backend = "none"
                "#,
            )?;
            let config = Config::extract(Config::figment(Some(Path::new("custom.toml"))))?;
            assert_eq!(config.schemes.bfv.plain_modulus, 65537);
            assert_eq!(config.storage.backend, hecrypt_storage::BackendKind::None);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_default_file() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, "[schemes.ckks]\nscale_bits = 30\n")?;
            jail.set_env("HECRYPT_SCHEMES__CKKS__SCALE_BITS", "35");
            let config = Config::extract(Config::figment(None))?;
            assert_eq!(config.schemes.ckks.scale_bits, 35);
            Ok(())
        });
    }

    #[test]
    fn test_fast_params_keep_flags() {
        let mut config = Config::default();
        config.schemes.ckks.enabled = false;
        let config = config.with_fast_params();
        assert_eq!(config.schemes.paillier.modulus_bits, 256);
        assert_eq!(config.schemes.bfv.poly_degree, 64);
        assert!(!config.schemes.ckks.enabled);
    }
}
