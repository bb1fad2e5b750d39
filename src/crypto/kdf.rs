// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Key Derivation
//!
//! Turns a private scalar and a peer ephemeral public key into the pair of
//! symmetric keys used by the envelope:
//!
//! 1. Split the peer key hex into X = chars [2,66) and Y = chars [66,130)
//! 2. ECDH: shared X = X(private * peer)
//! 3. Minimal unsigned big-endian bytes of the shared X
//! 4. SHA-512 over those bytes
//! 5. Encryption key = hash[0..32], MAC key = hash[32..64]

use sha2::{Digest, Sha512};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::codec::{hex_to_array, to_unsigned_bytes};
use super::curve::PointMultiplier;
use super::error::CryptoError;
use super::primitives::{CipherSuite, KeyDigest, Secp256k1Sha512AesCbcHmac};

/// Length of an uncompressed public key in hex (`04 || X || Y`)
pub const PUBLIC_KEY_HEX_LEN: usize = 130;

/// Maximum length of a private scalar in hex
pub const PRIVATE_KEY_HEX_LEN: usize = 64;

/// SHA-512 as a [`KeyDigest`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512Digest;

impl KeyDigest for Sha512Digest {
    const NAME: &'static str = "SHA-512";

    fn digest(data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(Sha512::digest(data).to_vec())
    }
}

/// Symmetric keys derived from one ECDH computation
///
/// Wiped from memory on drop. `Debug` never prints the key bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    encryption_key: [u8; 32],
    mac_key: [u8; 32],
}

impl DerivedKeys {
    pub fn encryption_key(&self) -> &[u8; 32] {
        &self.encryption_key
    }

    pub fn mac_key(&self) -> &[u8; 32] {
        &self.mac_key
    }
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeys")
            .field("encryption_key", &"<redacted>")
            .field("mac_key", &"<redacted>")
            .finish()
    }
}

/// Peer ephemeral public key split into affine coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerPublicKey {
    /// The full encoding as received (`04 || X || Y`), 65 bytes
    pub encoded: Vec<u8>,
    pub x: [u8; 32],
    pub y: [u8; 32],
}

/// Parse a 130-character uncompressed public key
pub fn parse_peer_public_key(public_key_hex: &str) -> Result<PeerPublicKey, CryptoError> {
    if public_key_hex.len() != PUBLIC_KEY_HEX_LEN || !public_key_hex.is_ascii() {
        return Err(CryptoError::key_agreement(
            "public_key_parse",
            format!(
                "expected {} hex characters, got {}",
                PUBLIC_KEY_HEX_LEN,
                public_key_hex.len()
            ),
        ));
    }
    if !public_key_hex.starts_with("04") {
        return Err(CryptoError::key_agreement(
            "public_key_parse",
            "expected uncompressed point prefix 04",
        ));
    }

    let coordinate = |hex_str: &str| {
        hex_to_array::<32>("ephem_public_key", hex_str)
            .map_err(|e| CryptoError::key_agreement("public_key_parse", e.to_string()))
    };
    let x = coordinate(&public_key_hex[2..66])?;
    let y = coordinate(&public_key_hex[66..])?;

    let mut encoded = Vec::with_capacity(65);
    encoded.push(0x04);
    encoded.extend_from_slice(&x);
    encoded.extend_from_slice(&y);

    Ok(PeerPublicKey { encoded, x, y })
}

/// Parse a private scalar given as up to 64 hex characters
///
/// Shorter values are left-padded with zeros, matching how the scalar is
/// read as a plain big integer.
pub fn parse_private_key(private_key_hex: &str) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let trimmed = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
    if trimmed.is_empty() || trimmed.len() > PRIVATE_KEY_HEX_LEN || !trimmed.is_ascii() {
        return Err(CryptoError::key_agreement(
            "private_key_parse",
            format!(
                "expected 1 to {} hex characters, got {}",
                PRIVATE_KEY_HEX_LEN,
                trimmed.len()
            ),
        ));
    }

    let padded = Zeroizing::new(format!("{:0>64}", trimmed));
    let scalar = hex_to_array::<32>("private_key", &padded)
        .map_err(|e| CryptoError::key_agreement("private_key_parse", e.to_string()))?;
    Ok(Zeroizing::new(scalar))
}

/// Derive the envelope keys with the default suite
pub fn derive_keys(
    private_key_hex: &str,
    peer_public_key_hex: &str,
) -> Result<DerivedKeys, CryptoError> {
    let peer = parse_peer_public_key(peer_public_key_hex)?;
    derive_keys_with::<Secp256k1Sha512AesCbcHmac>(private_key_hex, &peer)
}

/// Derive the envelope keys with an explicit [`CipherSuite`]
pub fn derive_keys_with<S: CipherSuite>(
    private_key_hex: &str,
    peer: &PeerPublicKey,
) -> Result<DerivedKeys, CryptoError> {
    let scalar = parse_private_key(private_key_hex)?;

    let shared_x = Zeroizing::new(S::Curve::default().scalar_multiply_x(
        &S::CURVE,
        &peer.x,
        &peer.y,
        &scalar,
    )?);
    let secret_bytes = Zeroizing::new(to_unsigned_bytes(&shared_x[..]));

    let hash = Zeroizing::new(S::Digest::digest(&secret_bytes)?);
    if hash.len() < 64 {
        return Err(CryptoError::DigestUnavailable {
            algorithm: S::Digest::NAME.to_string(),
        });
    }

    let mut keys = DerivedKeys {
        encryption_key: [0u8; 32],
        mac_key: [0u8; 32],
    };
    keys.encryption_key.copy_from_slice(&hash[..32]);
    keys.mac_key.copy_from_slice(&hash[32..64]);

    debug!(
        "Derived envelope keys (curve: {}, digest: {}, secret bytes: {})",
        S::CURVE.name,
        S::Digest::NAME,
        secret_bytes.len()
    );

    Ok(keys)
}
