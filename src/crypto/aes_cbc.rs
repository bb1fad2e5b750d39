// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-256-CBC Envelope Cipher
//!
//! AES-256 in CBC mode with PKCS#7 padding, keyed with the derived
//! encryption key and the IV configured for the session.
//!
//! **Format**:
//! ```text
//! ciphertext = CBC(pad(plaintext)), length a multiple of 16
//! ```
//!
//! Encryption is deterministic for a given key, IV and plaintext, so the
//! caller must never reuse an IV under the same key for different data.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::error::CryptoError;
use super::primitives::BlockCipher;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256-CBC with PKCS#7 padding as a [`BlockCipher`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256Cbc;

impl BlockCipher for Aes256Cbc {
    fn encrypt(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        encrypt(key, iv, plaintext)
    }

    fn decrypt(
        key: &[u8; 32],
        iv: &[u8; 16],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        decrypt(key, iv, ciphertext)
    }
}

/// Encrypt with AES-256-CBC and PKCS#7 padding
///
/// # Arguments
///
/// * `key` - 32-byte encryption key
/// * `iv` - 16-byte initialization vector (must be unique for this key)
/// * `plaintext` - Data to encrypt, any length including empty
///
/// # Returns
///
/// Ciphertext padded to a whole number of 16-byte blocks
pub fn encrypt(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| CryptoError::cipher("encrypt", format!("failed to create cipher: {}", e)))?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC ciphertext and strip PKCS#7 padding
///
/// # Errors
///
/// Returns `Cipher` if:
/// - Ciphertext is empty or not a multiple of 16 bytes
/// - Padding is invalid (wrong key, wrong IV or corrupted data)
///
/// The padding error never says which byte failed.
pub fn decrypt(key: &[u8; 32], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::cipher(
            "decrypt",
            format!(
                "ciphertext length {} is not a positive multiple of {}",
                ciphertext.len(),
                BLOCK_SIZE
            ),
        ));
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| CryptoError::cipher("decrypt", format!("failed to create cipher: {}", e)))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::cipher("decrypt", "invalid padding"))
}
