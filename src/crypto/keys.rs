// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session Key Helpers
//!
//! Small helpers around an existing session private key: its public point,
//! a fresh IV, and the ECDSA signature that accompanies session requests.
//! Generating the key pair itself is left to the caller.
//!
//! ## Security Considerations
//!
//! - Private keys are parsed into zeroizing buffers and never logged
//! - IVs come from the OS RNG

use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use rand::{rngs::OsRng, RngCore};
use tiny_keccak::{Hasher, Keccak};

use super::codec::bytes_to_hex;
use super::envelope::IV_LEN;
use super::error::CryptoError;
use super::kdf::parse_private_key;

/// Public point of a private key as 128 hex characters (`X || Y`, no prefix)
pub fn public_key_hex(private_key_hex: &str) -> Result<String, CryptoError> {
    let scalar = parse_private_key(private_key_hex)?;
    let secret = SecretKey::from_slice(&scalar[..]).map_err(|_| {
        CryptoError::key_agreement("public_key_derivation", "scalar is zero or out of range")
    })?;

    let point = secret.public_key().to_encoded_point(false);
    // Skip the 0x04 prefix byte
    Ok(bytes_to_hex(&point.as_bytes()[1..]))
}

/// Public point with the uncompressed `04` prefix, 130 hex characters
pub fn ephemeral_public_key_hex(private_key_hex: &str) -> Result<String, CryptoError> {
    Ok(format!("04{}", public_key_hex(private_key_hex)?))
}

/// Fresh random IV as 32 hex characters
pub fn random_iv_hex() -> String {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    bytes_to_hex(&iv)
}

/// Keccak-256 of arbitrary bytes
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut hash = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut hash);
    hash
}

/// ECDSA signature over Keccak-256 of `data`, DER-encoded hex
///
/// Deterministic (RFC 6979) with a low-S signature.
pub fn sign_payload(private_key_hex: &str, data: &str) -> Result<String, CryptoError> {
    let scalar = parse_private_key(private_key_hex)?;
    let signing_key = SigningKey::from_slice(&scalar[..]).map_err(|_| {
        CryptoError::key_agreement("payload_signing", "scalar is zero or out of range")
    })?;

    let hash = keccak256(data.as_bytes());
    let signature: Signature = signing_key
        .sign_prehash(&hash)
        .map_err(|e| CryptoError::key_agreement("payload_signing", e.to_string()))?;
    let signature = signature.normalize_s().unwrap_or(signature);

    Ok(bytes_to_hex(signature.to_der().as_bytes()))
}
