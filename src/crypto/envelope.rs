// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope Scheme
//!
//! Binds one private key, one peer ephemeral public key and one IV into a
//! scheme instance that can encrypt, tag and verify session payloads.
//!
//! ## Wire versions
//!
//! The MAC covers `iv || context || ciphertext`, where the context field
//! depends on the wire version:
//!
//! | Version | [`ContextVariant`] | Context bytes |
//! |---|---|---|
//! | 1 | `EphemeralPublicKey` | peer public key as received, `04 || X || Y` (65 bytes) |
//! | 2 | `EncryptionKey` | derived encryption key (32 bytes) |
//!
//! The two versions do not interoperate: a tag produced under one always
//! fails verification under the other.
//!
//! ## Usage
//!
//! ```rust
//! use session_envelope::crypto::{ContextVariant, EnvelopeScheme, SECP256K1};
//!
//! let peer = format!("04{}{}", SECP256K1.gx, SECP256K1.gy);
//! let iv = "00".repeat(16);
//!
//! let scheme = EnvelopeScheme::new("01", &peer, &iv, ContextVariant::EphemeralPublicKey)?;
//! let sealed = scheme.encrypt_and_sign(b"hello")?;
//! let plaintext = scheme.decrypt_and_verify(&sealed.ciphertext_hex, &sealed.tag_hex)?;
//! assert_eq!(plaintext, b"hello");
//! # Ok::<(), session_envelope::crypto::CryptoError>(())
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::codec::{bytes_to_hex, hex_to_array, hex_to_bytes};
use super::error::CryptoError;
use super::kdf::{derive_keys_with, parse_peer_public_key, DerivedKeys};
use super::mac::{build_authenticated_bytes, verify_tag, TAG_LEN};
use super::primitives::{BlockCipher, CipherSuite, MacAlgorithm, Secp256k1Sha512AesCbcHmac};

/// Length of the envelope IV in bytes
pub const IV_LEN: usize = 16;

/// Which field the MAC-covered context carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContextVariant {
    /// Wire version 1: the peer ephemeral public key
    #[default]
    #[serde(rename = "ephem-public-key")]
    EphemeralPublicKey,
    /// Wire version 2: the derived encryption key
    #[serde(rename = "encryption-key")]
    EncryptionKey,
}

impl ContextVariant {
    pub fn wire_version(&self) -> u8 {
        match self {
            ContextVariant::EphemeralPublicKey => 1,
            ContextVariant::EncryptionKey => 2,
        }
    }

    pub fn from_wire_version(version: u8) -> Result<Self, CryptoError> {
        match version {
            1 => Ok(ContextVariant::EphemeralPublicKey),
            2 => Ok(ContextVariant::EncryptionKey),
            other => Err(CryptoError::malformed(
                "wire_version",
                format!("unknown wire version {}", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextVariant::EphemeralPublicKey => "ephem-public-key",
            ContextVariant::EncryptionKey => "encryption-key",
        }
    }
}

impl fmt::Display for ContextVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextVariant {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ephem-public-key" | "1" => Ok(ContextVariant::EphemeralPublicKey),
            "encryption-key" | "2" => Ok(ContextVariant::EncryptionKey),
            other => Err(CryptoError::malformed(
                "context_variant",
                format!("unknown context variant '{}'", other),
            )),
        }
    }
}

/// Ciphertext and its tag, both lower-case hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    pub ciphertext_hex: String,
    pub tag_hex: String,
}

/// One negotiated envelope: derived keys, IV and context variant
///
/// Keys are derived in the constructor and wiped when the scheme is dropped.
/// The instance is immutable afterwards and can be shared across threads.
pub struct EnvelopeScheme<S: CipherSuite = Secp256k1Sha512AesCbcHmac> {
    keys: DerivedKeys,
    iv: [u8; IV_LEN],
    peer_public_key: Vec<u8>,
    variant: ContextVariant,
    _suite: PhantomData<fn() -> S>,
}

impl EnvelopeScheme {
    /// Build a scheme with the default secp256k1 / SHA-512 / AES-CBC / HMAC suite
    ///
    /// # Arguments
    ///
    /// * `private_key_hex` - Private scalar, up to 64 hex characters
    /// * `peer_public_key_hex` - Uncompressed peer ephemeral key, 130 hex characters
    /// * `iv_hex` - 16-byte IV as 32 hex characters
    /// * `variant` - Context field covered by the MAC
    ///
    /// # Errors
    ///
    /// - `KeyAgreement` if either key is invalid
    /// - `MalformedInput` if the IV is not 16 bytes of hex
    /// - `DigestUnavailable` if key expansion cannot run
    pub fn new(
        private_key_hex: &str,
        peer_public_key_hex: &str,
        iv_hex: &str,
        variant: ContextVariant,
    ) -> Result<Self, CryptoError> {
        Self::with_suite(private_key_hex, peer_public_key_hex, iv_hex, variant)
    }
}

impl<S: CipherSuite> EnvelopeScheme<S> {
    /// Build a scheme over an explicit [`CipherSuite`]
    pub fn with_suite(
        private_key_hex: &str,
        peer_public_key_hex: &str,
        iv_hex: &str,
        variant: ContextVariant,
    ) -> Result<Self, CryptoError> {
        let iv = hex_to_array::<IV_LEN>("iv", iv_hex)?;
        let peer = parse_peer_public_key(peer_public_key_hex)?;
        let keys = derive_keys_with::<S>(private_key_hex, &peer)?;

        debug!(
            "Envelope scheme ready (wire version {}, context: {})",
            variant.wire_version(),
            variant
        );

        Ok(Self {
            keys,
            iv,
            peer_public_key: peer.encoded,
            variant,
            _suite: PhantomData,
        })
    }

    pub fn variant(&self) -> ContextVariant {
        self.variant
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn peer_public_key(&self) -> &[u8] {
        &self.peer_public_key
    }

    /// The context field for this scheme's wire version
    fn context(&self) -> &[u8] {
        match self.variant {
            ContextVariant::EphemeralPublicKey => self.peer_public_key.as_slice(),
            ContextVariant::EncryptionKey => &self.keys.encryption_key()[..],
        }
    }

    /// Encrypt `plaintext` under the derived encryption key and configured IV
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let ciphertext = S::Cipher::encrypt(self.keys.encryption_key(), &self.iv, plaintext)?;
        debug!(
            "Encrypted payload ({} bytes -> {} bytes)",
            plaintext.len(),
            ciphertext.len()
        );
        Ok(ciphertext)
    }

    /// `iv || context || ciphertext`
    pub fn authenticated_bytes(&self, ciphertext: &[u8]) -> Vec<u8> {
        build_authenticated_bytes(&self.iv, self.context(), ciphertext)
    }

    /// Tag for a ciphertext produced by this scheme
    pub fn tag_for(&self, ciphertext: &[u8]) -> [u8; TAG_LEN] {
        S::Mac::sign(self.keys.mac_key(), &self.authenticated_bytes(ciphertext))
    }

    /// Encrypt and tag in one step
    pub fn encrypt_and_sign(&self, plaintext: &[u8]) -> Result<SealedEnvelope, CryptoError> {
        let ciphertext = self.encrypt(plaintext)?;
        let tag = self.tag_for(&ciphertext);
        Ok(SealedEnvelope {
            ciphertext_hex: bytes_to_hex(&ciphertext),
            tag_hex: bytes_to_hex(&tag),
        })
    }

    /// Constant-time check of `tag_hex` over this scheme's envelope bytes
    pub fn verify(&self, ciphertext: &[u8], tag_hex: &str) -> bool {
        let expected = match hex::decode(tag_hex) {
            Ok(bytes) if bytes.len() == TAG_LEN => bytes,
            _ => return false,
        };
        verify_tag::<S::Mac>(
            self.keys.mac_key(),
            &self.authenticated_bytes(ciphertext),
            &expected,
        )
    }

    /// Verify the tag, then decrypt
    ///
    /// Decryption never runs if the tag does not match.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` if `ciphertext_hex` is not hex
    /// - `Authentication` if the tag does not match (or is not a 32-byte hex tag)
    /// - `Cipher` if the authenticated ciphertext fails to decrypt
    pub fn decrypt_and_verify(
        &self,
        ciphertext_hex: &str,
        tag_hex: &str,
    ) -> Result<Vec<u8>, CryptoError> {
        let ciphertext = hex_to_bytes(ciphertext_hex).map_err(|e| match e {
            CryptoError::MalformedInput { reason, .. } => {
                CryptoError::malformed("ciphertext", reason)
            }
            other => other,
        })?;

        if !self.verify(&ciphertext, tag_hex) {
            warn!(
                "Envelope MAC mismatch (wire version {}), refusing to decrypt",
                self.variant.wire_version()
            );
            return Err(CryptoError::Authentication {
                reason: "HMAC tag mismatch".to_string(),
            });
        }

        S::Cipher::decrypt(self.keys.encryption_key(), &self.iv, &ciphertext)
    }

    /// HMAC of arbitrary data under the derived MAC key
    pub fn sign(&self, data: &[u8]) -> [u8; TAG_LEN] {
        S::Mac::sign(self.keys.mac_key(), data)
    }

    /// The derived MAC key as hex
    ///
    /// Only for protocols that ship the MAC key separately. Treat the result
    /// as secret.
    pub fn mac_key_hex(&self) -> String {
        bytes_to_hex(self.keys.mac_key())
    }
}

impl<S: CipherSuite> fmt::Debug for EnvelopeScheme<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeScheme")
            .field("keys", &self.keys)
            .field("iv", &bytes_to_hex(&self.iv))
            .field("variant", &self.variant)
            .finish()
    }
}
