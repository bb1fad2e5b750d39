// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hex / byte codec tests

use rand::{rngs::OsRng, RngCore};
use session_envelope::crypto::{bytes_to_hex, hex_to_bytes, to_unsigned_bytes, CryptoError};

#[test]
fn test_random_hex_roundtrip() {
    for len in [0usize, 1, 16, 33, 65] {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        let hex_str = bytes_to_hex(&bytes);
        assert_eq!(hex_str.len(), len * 2);
        assert_eq!(hex_str, hex_str.to_lowercase());
        assert_eq!(bytes_to_hex(&hex_to_bytes(&hex_str).unwrap()), hex_str);
    }
}

#[test]
fn test_invalid_hex_rejected() {
    for bad in ["0", "abc", "0g", "  ", "zz00"] {
        let err = hex_to_bytes(bad).unwrap_err();
        assert!(
            matches!(err, CryptoError::MalformedInput { .. }),
            "'{}' should be malformed",
            bad
        );
    }
}

#[test]
fn test_unsigned_bytes_never_leading_zero() {
    let vectors: [(&str, &str); 5] = [
        ("00ff", "ff"),
        ("0080", "80"),
        ("80", "80"),
        ("00000001", "01"),
        ("0000", "00"),
    ];
    for (input, expected) in vectors {
        let out = to_unsigned_bytes(&hex::decode(input).unwrap());
        assert_eq!(hex::encode(&out), expected, "input {}", input);
        if out.len() > 1 {
            assert_ne!(out[0], 0);
        }
    }
}
