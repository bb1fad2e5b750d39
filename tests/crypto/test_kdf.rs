// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Key Derivation Tests

use k256::SecretKey;
use rand::rngs::OsRng;
use session_envelope::crypto::{
    derive_keys, public_key_hex, to_unsigned_bytes, CryptoError, SECP256K1,
};
use sha2::{Digest, Sha512};

fn generator_hex() -> String {
    format!("04{}{}", SECP256K1.gx, SECP256K1.gy)
}

#[test]
fn test_derive_keys_deterministic() {
    let private = hex::encode(SecretKey::random(&mut OsRng).to_bytes());
    let peer = format!(
        "04{}",
        public_key_hex(&hex::encode(SecretKey::random(&mut OsRng).to_bytes())).unwrap()
    );

    let first = derive_keys(&private, &peer).unwrap();
    let second = derive_keys(&private, &peer).unwrap();
    assert_eq!(first.encryption_key(), second.encryption_key());
    assert_eq!(first.mac_key(), second.mac_key());
    assert_ne!(first.encryption_key(), first.mac_key());
}

#[test]
fn test_shared_secret_with_leading_zero_byte_is_stripped() {
    // Find k such that X(k*G) starts with a zero byte; shared X of k against G
    // is then that X, and the hash input must be its 31-byte form.
    let (scalar_hex, x) = (1u32..5000)
        .map(|k| {
            let scalar_hex = format!("{:x}", k);
            let public = hex::decode(public_key_hex(&scalar_hex).unwrap()).unwrap();
            (scalar_hex, public[..32].to_vec())
        })
        .find(|(_, x)| x[0] == 0)
        .expect("a scalar below 5000 yields an X with a leading zero byte");

    let keys = derive_keys(&scalar_hex, &generator_hex()).unwrap();

    let stripped = to_unsigned_bytes(&x);
    assert!(stripped.len() < 32);
    let expected = Sha512::digest(&stripped);
    assert_eq!(keys.encryption_key(), &expected[..32]);
    assert_eq!(keys.mac_key(), &expected[32..]);

    let unstripped = Sha512::digest(&x);
    assert_ne!(keys.encryption_key(), &unstripped[..32]);
}

#[test]
fn test_public_key_length_enforced() {
    let full = generator_hex();
    let too_long = format!("{}00", full);
    let candidates: [&str; 4] = ["", "04", &full[..129], too_long.as_str()];
    for bad in candidates {
        let err = derive_keys("01", bad).unwrap_err();
        assert!(
            matches!(err, CryptoError::KeyAgreement { .. }),
            "length {} should be a key agreement error",
            bad.len()
        );
    }
}

#[test]
fn test_compressed_prefix_rejected() {
    let bad = format!("02{}", &generator_hex()[2..]);
    let err = derive_keys("01", &bad).unwrap_err();
    assert!(matches!(err, CryptoError::KeyAgreement { .. }));
}

#[test]
fn test_private_key_out_of_range() {
    let err = derive_keys(SECP256K1.n, &generator_hex()).unwrap_err();
    assert!(matches!(err, CryptoError::KeyAgreement { .. }));

    let err = derive_keys("0", &generator_hex()).unwrap_err();
    assert!(matches!(err, CryptoError::KeyAgreement { .. }));

    let err = derive_keys("not-hex", &generator_hex()).unwrap_err();
    assert!(matches!(err, CryptoError::KeyAgreement { .. }));
}
