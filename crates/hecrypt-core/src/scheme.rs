//! Scheme identity and method selection

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifies a homomorphic scheme. Also the tag byte in ciphertext envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum SchemeId {
    #[serde(rename = "paillier")]
    Paillier = 0,
    #[serde(rename = "ckks")]
    Ckks = 1,
    #[serde(rename = "bfv")]
    Bfv = 2,
}

impl SchemeId {
    pub const ALL: [SchemeId; 3] = [SchemeId::Paillier, SchemeId::Ckks, SchemeId::Bfv];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeId::Paillier => "paillier",
            SchemeId::Ckks => "ckks",
            SchemeId::Bfv => "bfv",
        }
    }

    /// Whether decryption reproduces the plaintext bit-for-bit
    pub fn is_exact(&self) -> bool {
        !matches!(self, SchemeId::Ckks)
    }
}

impl std::fmt::Display for SchemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchemeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paillier" => Ok(SchemeId::Paillier),
            "ckks" => Ok(SchemeId::Ckks),
            "bfv" => Ok(SchemeId::Bfv),
            other => Err(CoreError::InvalidInput(format!("Unknown method: {other}"))),
        }
    }
}

impl TryFrom<u8> for SchemeId {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SchemeId::Paillier),
            1 => Ok(SchemeId::Ckks),
            2 => Ok(SchemeId::Bfv),
            other => Err(CoreError::Serialization(format!(
                "Unknown scheme tag: {other}"
            ))),
        }
    }
}

/// Which schemes a batch request asks for.
///
/// Tags are kept as raw strings until the orchestrator resolves them, so an
/// unknown tag inside a list becomes a per-method failure rather than a
/// request-level one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRequest {
    /// Every scheme configured at the time of the call
    All,
    Single(String),
    Many(Vec<String>),
}

impl MethodRequest {
    /// Parse `all`, a single tag, or a comma-separated list. A missing or
    /// blank value means `all`.
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(MethodRequest::All);
        };

        if value.eq_ignore_ascii_case("all") {
            return Ok(MethodRequest::All);
        }

        let mut tags: Vec<String> = Vec::new();
        for tag in value.split(',').map(|t| t.trim().to_lowercase()) {
            if tag.is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "Empty method in list: {value:?}"
                )));
            }
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(match tags.len() {
            1 => MethodRequest::Single(tags.remove(0)),
            _ => MethodRequest::Many(tags),
        })
    }
}

impl From<SchemeId> for MethodRequest {
    fn from(id: SchemeId) -> Self {
        MethodRequest::Single(id.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_id_roundtrips() {
        for id in SchemeId::ALL {
            assert_eq!(id.to_string().parse::<SchemeId>().unwrap(), id);
            assert_eq!(SchemeId::try_from(id as u8).unwrap(), id);
        }
        assert_eq!(" BFV ".parse::<SchemeId>().unwrap(), SchemeId::Bfv);
        assert!("rsa".parse::<SchemeId>().is_err());
        assert!(SchemeId::try_from(9).is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_tags() {
        assert_eq!(
            serde_json::to_string(&SchemeId::Ckks).unwrap(),
            "\"ckks\""
        );
    }

    #[test]
    fn test_parse_method_request() {
        assert_eq!(MethodRequest::parse(None).unwrap(), MethodRequest::All);
        assert_eq!(MethodRequest::parse(Some("  ")).unwrap(), MethodRequest::All);
        assert_eq!(MethodRequest::parse(Some("ALL")).unwrap(), MethodRequest::All);
        assert_eq!(
            MethodRequest::parse(Some("bfv")).unwrap(),
            MethodRequest::Single("bfv".into())
        );
        assert_eq!(
            MethodRequest::parse(Some("bfv, rsa,bfv")).unwrap(),
            MethodRequest::Many(vec!["bfv".into(), "rsa".into()])
        );
        assert!(MethodRequest::parse(Some("bfv,,ckks")).is_err());
    }
}
