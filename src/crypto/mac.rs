// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope Authenticator
//!
//! HMAC-SHA256 over the canonical envelope bytes:
//!
//! ```text
//! authenticated = iv (16) || context (65 or 32) || ciphertext
//! ```
//!
//! The order is the wire contract. Producer and verifier must build these
//! bytes identically or every tag will be rejected.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::primitives::MacAlgorithm;

type HmacSha256Core = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag in bytes
pub const TAG_LEN: usize = 32;

/// HMAC-SHA256 as a [`MacAlgorithm`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256;

impl MacAlgorithm for HmacSha256 {
    fn sign(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
        sign(key, data)
    }
}

/// Concatenate `iv || context || ciphertext`
pub fn build_authenticated_bytes(iv: &[u8], context: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(iv.len() + context.len() + ciphertext.len());
    data.extend_from_slice(iv);
    data.extend_from_slice(context);
    data.extend_from_slice(ciphertext);
    data
}

/// HMAC-SHA256 of `data` under `mac_key`
pub fn sign(mac_key: &[u8; 32], data: &[u8]) -> [u8; TAG_LEN] {
    let mut mac = <HmacSha256Core as Mac>::new_from_slice(mac_key)
        .expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Check a hex-encoded tag against `data`
///
/// The comparison runs in constant time over the tag bytes. A tag that is not
/// valid hex or not 32 bytes long never verifies.
pub fn verify(mac_key: &[u8; 32], data: &[u8], expected_tag_hex: &str) -> bool {
    let expected = match hex::decode(expected_tag_hex) {
        Ok(bytes) if bytes.len() == TAG_LEN => bytes,
        _ => return false,
    };
    verify_tag::<HmacSha256>(mac_key, data, &expected)
}

/// Constant-time check of a raw tag with any [`MacAlgorithm`]
pub fn verify_tag<M: MacAlgorithm>(mac_key: &[u8; 32], data: &[u8], expected: &[u8]) -> bool {
    let computed = M::sign(mac_key, data);
    computed[..].ct_eq(expected).into()
}
