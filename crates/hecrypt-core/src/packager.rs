//! Transport encoding and compression of ciphertext payloads
//!
//! A persisted artifact is `zstd(base64(envelope))`. Frames are written with a
//! content checksum so corruption surfaces as a [`CoreError::Compression`]
//! instead of a confusing failure further down the pipeline.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{CoreError, CoreResult};
use crate::scheme::SchemeId;

pub const COMPRESSION_LEVEL: i32 = 3;

/// Upper bound on decompressed artifact size unless the caller sets one
pub const DEFAULT_MAX_DECOMPRESSED: usize = 256 * 1024 * 1024;

/// File name suffix of persisted artifacts
pub const ARTIFACT_SUFFIX: &str = "encrypted.zst";

/// `{filename}.{method}.encrypted.zst`
pub fn artifact_name(filename: &str, method: SchemeId) -> String {
    format!("{filename}.{method}.{ARTIFACT_SUFFIX}")
}

/// Bytes → text-safe base64
pub fn serialize(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn deserialize(text: &str) -> CoreResult<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| CoreError::Serialization(format!("Invalid base64 payload: {e}")))
}

pub fn compress(bytes: &[u8]) -> CoreResult<Vec<u8>> {
    let compress_err = |e: std::io::Error| CoreError::Compression(e.to_string());

    let mut encoder =
        zstd::stream::write::Encoder::new(Vec::new(), COMPRESSION_LEVEL).map_err(compress_err)?;
    encoder.include_checksum(true).map_err(compress_err)?;
    encoder.write_all(bytes).map_err(compress_err)?;
    encoder.finish().map_err(compress_err)
}

/// Inflate a zstd stream, refusing output larger than `limit` bytes
pub fn decompress(bytes: &[u8], limit: usize) -> CoreResult<Vec<u8>> {
    if bytes.is_empty() {
        return Err(CoreError::Compression("Empty compressed stream".to_string()));
    }
    let corrupted =
        |e: std::io::Error| CoreError::Compression(format!("Corrupted compressed stream: {e}"));

    let mut decoder = zstd::stream::read::Decoder::new(bytes).map_err(corrupted)?;
    let mut out = Vec::new();
    decoder
        .by_ref()
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(corrupted)?;

    if out.len() > limit {
        return Err(CoreError::Compression(format!(
            "Decompressed payload exceeds {limit} bytes"
        )));
    }
    Ok(out)
}

/// Ciphertext bytes → persisted artifact
pub fn package(ciphertext: &[u8]) -> CoreResult<Vec<u8>> {
    compress(serialize(ciphertext).as_bytes())
}

/// Persisted artifact → transport text
pub fn unpackage(artifact: &[u8], limit: usize) -> CoreResult<String> {
    let transport = decompress(artifact, limit)?;
    String::from_utf8(transport)
        .map_err(|_| CoreError::Serialization("Decompressed payload is not text".to_string()))
}
