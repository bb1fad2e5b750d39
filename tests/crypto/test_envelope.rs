// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope Scheme Tests
//!
//! Round-trips, fail-closed verification and the wire-version split.

use k256::SecretKey;
use rand::rngs::OsRng;
use session_envelope::crypto::{
    ephemeral_public_key_hex, ContextVariant, CryptoError, EnvelopeScheme, SECP256K1,
};

fn generator_hex() -> String {
    format!("04{}{}", SECP256K1.gx, SECP256K1.gy)
}

fn zero_iv() -> String {
    "00".repeat(16)
}

fn random_private_key_hex() -> String {
    hex::encode(SecretKey::random(&mut OsRng).to_bytes())
}

#[test]
fn test_hello_scenario() {
    // Private key 0x01, peer = generator, IV = 16 zero bytes
    let scheme = EnvelopeScheme::new(
        "01",
        &generator_hex(),
        &zero_iv(),
        ContextVariant::EphemeralPublicKey,
    )
    .unwrap();

    let ciphertext = scheme.encrypt(b"hello").unwrap();
    assert_eq!(ciphertext.len(), 16);
    let tag_hex = hex::encode(scheme.tag_for(&ciphertext));
    let ciphertext_hex = hex::encode(&ciphertext);

    let plaintext = scheme.decrypt_and_verify(&ciphertext_hex, &tag_hex).unwrap();
    assert_eq!(plaintext, b"hello");

    // Corrupt the last hex character of the tag
    let mut corrupted = tag_hex.clone();
    let last = corrupted.pop().unwrap();
    corrupted.push(if last == '0' { '1' } else { '0' });

    let err = scheme
        .decrypt_and_verify(&ciphertext_hex, &corrupted)
        .unwrap_err();
    assert!(
        matches!(err, CryptoError::Authentication { .. }),
        "Corrupted tag must fail authentication, got {:?}",
        err
    );
}

#[test]
fn test_roundtrip_various_lengths() {
    let peer = ephemeral_public_key_hex(&random_private_key_hex()).unwrap();
    let scheme = EnvelopeScheme::new(
        &random_private_key_hex(),
        &peer,
        &"5a".repeat(16),
        ContextVariant::EphemeralPublicKey,
    )
    .unwrap();

    for len in [0usize, 1, 15, 16, 17, 255, 4096] {
        let plaintext: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
        let sealed = scheme.encrypt_and_sign(&plaintext).unwrap();
        let decrypted = scheme
            .decrypt_and_verify(&sealed.ciphertext_hex, &sealed.tag_hex)
            .unwrap();
        assert_eq!(decrypted, plaintext, "Round-trip failed for length {}", len);
    }
}

#[test]
fn test_encryption_is_deterministic_for_same_iv() {
    let scheme = EnvelopeScheme::new(
        "01",
        &generator_hex(),
        &zero_iv(),
        ContextVariant::EncryptionKey,
    )
    .unwrap();
    assert_eq!(
        scheme.encrypt(b"same").unwrap(),
        scheme.encrypt(b"same").unwrap()
    );
}

#[test]
fn test_ecdh_both_sides_agree() {
    let alice = random_private_key_hex();
    let bob = random_private_key_hex();
    let alice_pub = ephemeral_public_key_hex(&alice).unwrap();
    let bob_pub = ephemeral_public_key_hex(&bob).unwrap();
    let iv = "0f".repeat(16);

    // Version 2 context is the shared encryption key, so either side can open
    let sender =
        EnvelopeScheme::new(&alice, &bob_pub, &iv, ContextVariant::EncryptionKey).unwrap();
    let receiver =
        EnvelopeScheme::new(&bob, &alice_pub, &iv, ContextVariant::EncryptionKey).unwrap();

    assert_eq!(sender.mac_key_hex(), receiver.mac_key_hex());

    let sealed = sender.encrypt_and_sign(b"shared secret payload").unwrap();
    let plaintext = receiver
        .decrypt_and_verify(&sealed.ciphertext_hex, &sealed.tag_hex)
        .unwrap();
    assert_eq!(plaintext, b"shared secret payload");
}

#[test]
fn test_variants_do_not_interoperate() {
    let v1 = EnvelopeScheme::new(
        "01",
        &generator_hex(),
        &zero_iv(),
        ContextVariant::EphemeralPublicKey,
    )
    .unwrap();
    let v2 = EnvelopeScheme::new(
        "01",
        &generator_hex(),
        &zero_iv(),
        ContextVariant::EncryptionKey,
    )
    .unwrap();

    // Same keys, same ciphertext, different MAC-covered context
    assert_eq!(v1.mac_key_hex(), v2.mac_key_hex());
    let from_v1 = v1.encrypt_and_sign(b"versioned").unwrap();
    let from_v2 = v2.encrypt_and_sign(b"versioned").unwrap();
    assert_eq!(from_v1.ciphertext_hex, from_v2.ciphertext_hex);
    assert_ne!(from_v1.tag_hex, from_v2.tag_hex);

    let err = v2
        .decrypt_and_verify(&from_v1.ciphertext_hex, &from_v1.tag_hex)
        .unwrap_err();
    assert!(matches!(err, CryptoError::Authentication { .. }));

    let err = v1
        .decrypt_and_verify(&from_v2.ciphertext_hex, &from_v2.tag_hex)
        .unwrap_err();
    assert!(matches!(err, CryptoError::Authentication { .. }));
}

#[test]
fn test_version1_context_is_peer_key() {
    let scheme = EnvelopeScheme::new(
        "01",
        &generator_hex(),
        &zero_iv(),
        ContextVariant::EphemeralPublicKey,
    )
    .unwrap();
    let ciphertext = [0xabu8; 16];
    let bytes = scheme.authenticated_bytes(&ciphertext);

    let mut expected = vec![0u8; 16];
    expected.extend_from_slice(&hex::decode(generator_hex()).unwrap());
    expected.extend_from_slice(&ciphertext);
    assert_eq!(bytes, expected);
}

#[test]
fn test_sign_uses_mac_key() {
    let scheme = EnvelopeScheme::new(
        "01",
        &generator_hex(),
        &zero_iv(),
        ContextVariant::EphemeralPublicKey,
    )
    .unwrap();
    let data = scheme.authenticated_bytes(&[1u8; 16]);
    assert_eq!(scheme.sign(&data), scheme.tag_for(&[1u8; 16]));
    assert_eq!(scheme.mac_key_hex().len(), 64);
}

#[test]
fn test_invalid_public_key_rejected() {
    let err = EnvelopeScheme::new(
        "01",
        "04abcd",
        &zero_iv(),
        ContextVariant::EphemeralPublicKey,
    )
    .unwrap_err();
    assert!(matches!(err, CryptoError::KeyAgreement { .. }));

    // Right length, not on the curve
    let off_curve = format!("04{}{}", "11".repeat(32), "22".repeat(32));
    let err = EnvelopeScheme::new(
        "01",
        &off_curve,
        &zero_iv(),
        ContextVariant::EphemeralPublicKey,
    )
    .unwrap_err();
    assert!(matches!(err, CryptoError::KeyAgreement { .. }));
}

#[test]
fn test_scheme_shared_across_threads() {
    let scheme = std::sync::Arc::new(
        EnvelopeScheme::new(
            "01",
            &generator_hex(),
            &zero_iv(),
            ContextVariant::EphemeralPublicKey,
        )
        .unwrap(),
    );
    let sealed = scheme.encrypt_and_sign(b"threaded").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scheme = scheme.clone();
            let sealed = sealed.clone();
            std::thread::spawn(move || {
                scheme
                    .decrypt_and_verify(&sealed.ciphertext_hex, &sealed.tag_hex)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), b"threaded");
    }
}
