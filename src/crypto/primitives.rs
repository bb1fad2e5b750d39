// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Primitive capability traits
//!
//! The envelope protocol is written against these traits so that the hash,
//! block cipher, MAC or curve can be swapped without touching the protocol
//! code in `envelope`. [`Secp256k1Sha512AesCbcHmac`] is the only suite the
//! wire format currently defines.

use super::aes_cbc::Aes256Cbc;
use super::curve::{CurveParams, PointMultiplier, Secp256k1Multiplier, SECP256K1};
use super::error::CryptoError;
use super::kdf::Sha512Digest;
use super::mac::HmacSha256;

/// Hash used to expand the ECDH shared secret
pub trait KeyDigest {
    const NAME: &'static str;

    /// Must return at least 64 bytes
    fn digest(data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// 256-bit-key block cipher in a padded chaining mode with a 16-byte IV
pub trait BlockCipher {
    fn encrypt(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    fn decrypt(key: &[u8; 32], iv: &[u8; 16], ciphertext: &[u8])
        -> Result<Vec<u8>, CryptoError>;
}

/// Keyed MAC producing a 32-byte tag
pub trait MacAlgorithm {
    fn sign(key: &[u8; 32], data: &[u8]) -> [u8; 32];
}

/// Bundle of primitives an envelope scheme is built from
pub trait CipherSuite {
    type Curve: PointMultiplier + Default;
    type Digest: KeyDigest;
    type Cipher: BlockCipher;
    type Mac: MacAlgorithm;

    const CURVE: CurveParams;
}

/// secp256k1 ECDH, SHA-512 key expansion, AES-256-CBC, HMAC-SHA256
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Sha512AesCbcHmac;

impl CipherSuite for Secp256k1Sha512AesCbcHmac {
    type Curve = Secp256k1Multiplier;
    type Digest = Sha512Digest;
    type Cipher = Aes256Cbc;
    type Mac = HmacSha256;

    const CURVE: CurveParams = SECP256K1;
}
