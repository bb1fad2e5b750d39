// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session Envelope Encryption
//!
//! This module implements the ECIES-style envelope used to protect session
//! payloads exchanged with a counterpart holding an ephemeral secp256k1 key:
//!
//! - **Curve**: secp256k1 point multiplication behind the `PointMultiplier` trait
//! - **Codec**: hex and minimal big-endian byte helpers
//! - **KDF**: SHA-512 over the ECDH shared X, split into encryption and MAC keys
//! - **AES-CBC**: AES-256-CBC with PKCS#7 padding
//! - **MAC**: HMAC-SHA256 over `iv || context || ciphertext`
//! - **Envelope**: the scheme tying it together, with explicit wire versions
//! - **Keys**: public point, IV and request signature helpers
//!
//! ## Security Considerations
//!
//! - Derived keys live in memory only and are zeroized on drop
//! - An IV must never be reused with the same key for different plaintexts
//! - Tags are compared in constant time
//! - Decryption never runs before the tag has been verified
//!
//! ## Protocol Flow
//!
//! 1. Caller supplies a private key, the peer ephemeral public key and an IV
//! 2. ECDH yields the shared X coordinate
//! 3. SHA-512(shared X) is split into a 32-byte AES key and a 32-byte MAC key
//! 4. Sender encrypts with AES-256-CBC and tags `iv || context || ciphertext`
//! 5. Receiver verifies the tag first and only then decrypts

pub mod aes_cbc;
pub mod codec;
pub mod curve;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod mac;
pub mod primitives;

pub use codec::{bytes_to_hex, hex_to_bytes, to_unsigned_bytes};
pub use curve::{CurveParams, PointMultiplier, Secp256k1Multiplier, SECP256K1};
pub use envelope::{ContextVariant, EnvelopeScheme, SealedEnvelope, IV_LEN};
pub use error::{CryptoError, ErrorKind};
pub use kdf::{derive_keys, DerivedKeys};
pub use keys::{ephemeral_public_key_hex, public_key_hex, random_iv_hex, sign_payload};
pub use primitives::{BlockCipher, CipherSuite, KeyDigest, MacAlgorithm, Secp256k1Sha512AesCbcHmac};
