//! Per-scheme configuration

use hecrypt_schemes::{BfvParams, CkksParams, PaillierParams};
use serde::{Deserialize, Serialize};

use crate::scheme::SchemeId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemesConfig {
    pub paillier: PaillierConfig,
    pub ckks: CkksConfig,
    pub bfv: BfvConfig,
}

impl SchemesConfig {
    pub fn is_enabled(&self, id: SchemeId) -> bool {
        match id {
            SchemeId::Paillier => self.paillier.enabled,
            SchemeId::Ckks => self.ckks.enabled,
            SchemeId::Bfv => self.bfv.enabled,
        }
    }

    /// Whether the private key is kept after key generation
    pub fn can_decrypt(&self, id: SchemeId) -> bool {
        match id {
            SchemeId::Paillier => self.paillier.decrypt,
            SchemeId::Ckks => self.ckks.decrypt,
            SchemeId::Bfv => self.bfv.decrypt,
        }
    }

    /// Restrict to the given schemes, disabling the rest
    pub fn only(mut self, ids: &[SchemeId]) -> Self {
        self.paillier.enabled &= ids.contains(&SchemeId::Paillier);
        self.ckks.enabled &= ids.contains(&SchemeId::Ckks);
        self.bfv.enabled &= ids.contains(&SchemeId::Bfv);
        self
    }

    /// Small, fast parameter sets for tests and local experiments
    pub fn insecure_fast() -> Self {
        Self {
            paillier: PaillierConfig {
                modulus_bits: 256,
                ..Default::default()
            },
            ckks: CkksConfig {
                poly_degree: 64,
                ..Default::default()
            },
            bfv: BfvConfig {
                poly_degree: 64,
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaillierConfig {
    pub enabled: bool,
    pub decrypt: bool,
    pub modulus_bits: u64,
}

impl Default for PaillierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            decrypt: true,
            modulus_bits: PaillierParams::default().modulus_bits,
        }
    }
}

impl PaillierConfig {
    pub fn params(&self) -> PaillierParams {
        PaillierParams::new(self.modulus_bits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CkksConfig {
    pub enabled: bool,
    pub decrypt: bool,
    pub poly_degree: usize,
    pub scale_bits: u32,
}

impl Default for CkksConfig {
    fn default() -> Self {
        let params = CkksParams::default();
        Self {
            enabled: true,
            decrypt: true,
            poly_degree: params.poly_degree,
            scale_bits: params.scale_bits,
        }
    }
}

impl CkksConfig {
    pub fn params(&self) -> CkksParams {
        CkksParams::new(self.poly_degree, self.scale_bits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BfvConfig {
    pub enabled: bool,
    pub decrypt: bool,
    pub poly_degree: usize,
    pub plain_modulus: u64,
}

impl Default for BfvConfig {
    fn default() -> Self {
        let params = BfvParams::default();
        Self {
            enabled: true,
            decrypt: true,
            poly_degree: params.poly_degree,
            plain_modulus: params.plain_modulus,
        }
    }
}

impl BfvConfig {
    pub fn params(&self) -> BfvParams {
        BfvParams::new(self.poly_degree, self.plain_modulus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchemesConfig::default();
        assert_eq!(config.paillier.modulus_bits, 1024);
        assert_eq!(config.ckks.poly_degree, 4096);
        assert_eq!(config.ckks.scale_bits, 40);
        assert_eq!(config.bfv.plain_modulus, 786_433);
        assert!(SchemeId::ALL.iter().all(|id| config.is_enabled(*id)));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SchemesConfig =
            serde_json::from_str(r#"{"bfv": {"plain_modulus": 65537}, "ckks": {"enabled": false}}"#)
                .unwrap();
        assert_eq!(config.bfv.plain_modulus, 65_537);
        assert_eq!(config.bfv.poly_degree, 4096);
        assert!(!config.is_enabled(SchemeId::Ckks));
        assert!(config.is_enabled(SchemeId::Paillier));
    }

    #[test]
    fn test_only() {
        let config = SchemesConfig::default().only(&[SchemeId::Bfv]);
        assert!(config.is_enabled(SchemeId::Bfv));
        assert!(!config.is_enabled(SchemeId::Paillier));
        assert!(!config.is_enabled(SchemeId::Ckks));
    }
}
