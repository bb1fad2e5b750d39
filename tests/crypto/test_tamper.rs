// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tamper Detection Tests
//!
//! Any single-bit change to the ciphertext or IV must be caught by the MAC
//! before decryption runs.

use session_envelope::crypto::{ContextVariant, CryptoError, EnvelopeScheme, SECP256K1};

fn generator_hex() -> String {
    format!("04{}{}", SECP256K1.gx, SECP256K1.gy)
}

const IV_HEX: &str = "000102030405060708090a0b0c0d0e0f";

fn scheme_with_iv(iv_hex: &str) -> EnvelopeScheme {
    EnvelopeScheme::new("01", &generator_hex(), iv_hex, ContextVariant::EphemeralPublicKey)
        .unwrap()
}

#[test]
fn test_every_ciphertext_bit_flip_is_rejected() {
    let scheme = scheme_with_iv(IV_HEX);
    let ciphertext = scheme.encrypt(b"tamper-evident payload").unwrap();
    let tag_hex = hex::encode(scheme.tag_for(&ciphertext));

    for byte in 0..ciphertext.len() {
        for bit in 0..8 {
            let mut tampered = ciphertext.clone();
            tampered[byte] ^= 1 << bit;

            assert!(!scheme.verify(&tampered, &tag_hex));
            let err = scheme
                .decrypt_and_verify(&hex::encode(&tampered), &tag_hex)
                .unwrap_err();
            assert!(
                matches!(err, CryptoError::Authentication { .. }),
                "byte {} bit {} not detected: {:?}",
                byte,
                bit,
                err
            );
        }
    }
}

#[test]
fn test_every_iv_bit_flip_is_rejected() {
    let scheme = scheme_with_iv(IV_HEX);
    let sealed = scheme.encrypt_and_sign(b"iv bound").unwrap();
    let iv = hex::decode(IV_HEX).unwrap();

    for byte in 0..iv.len() {
        for bit in 0..8 {
            let mut tampered_iv = iv.clone();
            tampered_iv[byte] ^= 1 << bit;
            let receiver = scheme_with_iv(&hex::encode(&tampered_iv));

            let err = receiver
                .decrypt_and_verify(&sealed.ciphertext_hex, &sealed.tag_hex)
                .unwrap_err();
            assert!(matches!(err, CryptoError::Authentication { .. }));
        }
    }
}

#[test]
fn test_truncated_ciphertext_fails_authentication_not_cipher() {
    // Fail closed: a misaligned ciphertext with a wrong tag never reaches AES
    let scheme = scheme_with_iv(IV_HEX);
    let sealed = scheme.encrypt_and_sign(b"0123456789abcdef0123").unwrap();
    let truncated = &sealed.ciphertext_hex[..sealed.ciphertext_hex.len() - 2];

    let err = scheme
        .decrypt_and_verify(truncated, &sealed.tag_hex)
        .unwrap_err();
    assert!(matches!(err, CryptoError::Authentication { .. }));
}

#[test]
fn test_bad_padding_with_valid_tag_is_cipher_error() {
    // A ciphertext the holder of the MAC key tagged, but which does not unpad
    let scheme = scheme_with_iv(IV_HEX);
    let garbage = [0x42u8; 32];
    let tag_hex = hex::encode(scheme.tag_for(&garbage));

    match scheme.decrypt_and_verify(&hex::encode(garbage), &tag_hex) {
        Err(err) => assert!(matches!(err, CryptoError::Cipher { .. })),
        // Small chance the garbage happens to end in valid padding
        Ok(plaintext) => assert!(plaintext.len() < 32),
    }
}
