//! Text ↔ code-point sequences

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// One non-negative integer per source character, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedContent(Vec<u32>);

impl EncodedContent {
    pub fn from_code_points(points: Vec<u32>) -> Self {
        Self(points)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest code point present, used for per-scheme range checks
    pub fn max_value(&self) -> Option<u32> {
        self.0.iter().copied().max()
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

/// Space-separated decimal code points, e.g. `72 105`
impl fmt::Display for EncodedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, point) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{point}")?;
        }
        Ok(())
    }
}

pub fn encode(text: &str) -> EncodedContent {
    EncodedContent(text.chars().map(u32::from).collect())
}

/// Exact inverse of [`encode`]. Never rounds; a value that is not a Unicode
/// scalar is an encoding error.
pub fn decode(content: &EncodedContent) -> CoreResult<String> {
    content
        .0
        .iter()
        .enumerate()
        .map(|(index, point)| {
            char::from_u32(*point).ok_or_else(|| {
                CoreError::Encoding(format!(
                    "Value {point:#x} at position {index} is not a valid code point"
                ))
            })
        })
        .collect()
}
