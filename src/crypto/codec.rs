// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hex and big-endian byte helpers
//!
//! Everything that crosses the envelope boundary is hex. Shared secrets are
//! hashed in their minimal unsigned big-endian form, which is what
//! [`to_unsigned_bytes`] produces.

use super::error::CryptoError;

/// Decode a hex string into raw bytes
///
/// Fails with `MalformedInput` on odd length or non-hex characters.
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>, CryptoError> {
    if hex_str.len() % 2 != 0 {
        return Err(CryptoError::malformed(
            "hex",
            format!("odd number of hex characters: {}", hex_str.len()),
        ));
    }
    hex::decode(hex_str).map_err(|e| CryptoError::malformed("hex", e.to_string()))
}

/// Lower-case hex, two characters per byte, no separators
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex field that must be exactly `N` bytes long
pub fn hex_to_array<const N: usize>(field: &str, hex_str: &str) -> Result<[u8; N], CryptoError> {
    let bytes = hex_to_bytes(hex_str).map_err(|e| match e {
        CryptoError::MalformedInput { reason, .. } => CryptoError::malformed(field, reason),
        other => other,
    })?;
    bytes.as_slice().try_into().map_err(|_| {
        CryptoError::malformed(
            field,
            format!("expected {} bytes, got {}", N, bytes.len()),
        )
    })
}

/// Minimal unsigned big-endian representation of a big-endian integer
///
/// Strips all leading zero bytes. Zero is encoded as a single `0x00`.
/// Fixed-width encodings (like a 32-byte field element) must go through this
/// before hashing, otherwise keys derived for secrets with a leading zero
/// byte won't match the peer's.
pub fn to_unsigned_bytes(big_endian: &[u8]) -> Vec<u8> {
    match big_endian.iter().position(|&b| b != 0) {
        Some(first) => big_endian[first..].to_vec(),
        None => vec![0u8],
    }
}
