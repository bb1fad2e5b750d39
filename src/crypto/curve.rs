// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! secp256k1 point multiplication
//!
//! The envelope only needs one thing from the curve: the affine X coordinate
//! of `scalar * point`. That contract is the [`PointMultiplier`] trait; the
//! arithmetic itself comes from `k256`, which is constant-time with respect
//! to the scalar.

use k256::{
    elliptic_curve::sec1::FromEncodedPoint, EncodedPoint, FieldBytes, PublicKey, SecretKey,
};

use super::error::CryptoError;

/// Short Weierstrass curve `y^2 = x^3 + a*x + b mod p`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParams {
    pub name: &'static str,
    /// Field prime, big-endian hex
    pub p: &'static str,
    pub a: u64,
    pub b: u64,
    /// Group order, big-endian hex
    pub n: &'static str,
    /// Generator X, big-endian hex
    pub gx: &'static str,
    /// Generator Y, big-endian hex
    pub gy: &'static str,
}

pub const SECP256K1: CurveParams = CurveParams {
    name: "secp256k1",
    p: "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
    a: 0,
    b: 7,
    n: "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
    gx: "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
    gy: "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
};

/// Scalar multiplication returning the affine X coordinate
pub trait PointMultiplier {
    /// Compute `X(scalar * (x, y))` on the curve described by `params`
    ///
    /// Implementations must reject points that are not on the curve and
    /// scalars that would yield the point at infinity.
    fn scalar_multiply_x(
        &self,
        params: &CurveParams,
        x: &[u8; 32],
        y: &[u8; 32],
        scalar: &[u8; 32],
    ) -> Result<[u8; 32], CryptoError>;
}

/// [`PointMultiplier`] backed by `k256`
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Multiplier;

impl PointMultiplier for Secp256k1Multiplier {
    fn scalar_multiply_x(
        &self,
        params: &CurveParams,
        x: &[u8; 32],
        y: &[u8; 32],
        scalar: &[u8; 32],
    ) -> Result<[u8; 32], CryptoError> {
        if *params != SECP256K1 {
            return Err(CryptoError::key_agreement(
                "curve_selection",
                format!("unsupported curve: {}", params.name),
            ));
        }

        let encoded =
            EncodedPoint::from_affine_coordinates(FieldBytes::from_slice(x), FieldBytes::from_slice(y), false);
        let peer = Option::<PublicKey>::from(PublicKey::from_encoded_point(&encoded)).ok_or_else(
            || CryptoError::key_agreement("public_key_parse", "point is not on secp256k1"),
        )?;

        // Rejects zero and scalars >= n
        let secret = SecretKey::from_slice(scalar).map_err(|_| {
            CryptoError::key_agreement("private_key_parse", "scalar is zero or out of range")
        })?;

        let shared = k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
        let mut shared_x = [0u8; 32];
        shared_x.copy_from_slice(shared.raw_secret_bytes());
        Ok(shared_x)
    }
}
