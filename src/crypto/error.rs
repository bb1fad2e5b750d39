// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error taxonomy for the envelope scheme. Each variant maps to one failure
//! class, and every class is terminal for the operation that raised it.
//!
//! ## Error Variants
//!
//! - **MalformedInput**: bad hex, wrong field length
//! - **KeyAgreement**: invalid public/private key or curve-point failure
//! - **DigestUnavailable**: the key-derivation hash could not produce 64 bytes
//! - **Cipher**: AES-CBC failure (bad padding, block misalignment, bad key/IV)
//! - **Authentication**: HMAC tag mismatch
//!
//! ## Context Preservation
//!
//! Variants carry the field or operation that failed so callers can log
//! something useful. None of them ever carries key bytes, plaintext or tags.
//!
//! ## Usage Example
//!
//! ```rust
//! use session_envelope::crypto::{CryptoError, ErrorKind};
//!
//! let err = CryptoError::Authentication {
//!     reason: "tag mismatch".to_string(),
//! };
//! assert_eq!(err.kind(), ErrorKind::Authentication);
//! ```

use thiserror::Error;

/// Error type for all envelope operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input could not be decoded
    ///
    /// This error occurs when:
    /// - A hex field has odd length or non-hex characters
    /// - A decoded field has the wrong length (e.g. IV not 16 bytes)
    #[error("Malformed input field '{field}': {reason}")]
    MalformedInput {
        /// Which input field failed
        field: String,
        /// Specific failure reason
        reason: String,
    },

    /// ECDH key agreement failed
    ///
    /// This error occurs when:
    /// - The peer public key is not 130 hex characters
    /// - The coordinates are not a point on secp256k1
    /// - The private scalar is zero or outside the group order
    #[error("Key agreement failed during {operation}: {reason}")]
    KeyAgreement {
        /// Which step of the agreement failed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// The key-derivation digest is unusable
    ///
    /// Fatal configuration error: retrying cannot help.
    #[error("Digest {algorithm} is unavailable")]
    DigestUnavailable {
        /// Name of the digest that was requested
        algorithm: String,
    },

    /// AES-CBC encryption or decryption failed
    #[error("Cipher failure during {operation}: {reason}")]
    Cipher {
        /// Which cipher operation failed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// HMAC verification failed
    ///
    /// Decryption is never attempted after this error.
    #[error("Authentication failed: {reason}")]
    Authentication {
        /// Specific failure reason
        reason: String,
    },
}

/// Error kind without any cause text
///
/// Lets callers report what went wrong to their own users without exposing
/// internal detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    KeyAgreement,
    DigestUnavailable,
    Cipher,
    Authentication,
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoError::MalformedInput { .. } => ErrorKind::MalformedInput,
            CryptoError::KeyAgreement { .. } => ErrorKind::KeyAgreement,
            CryptoError::DigestUnavailable { .. } => ErrorKind::DigestUnavailable,
            CryptoError::Cipher { .. } => ErrorKind::Cipher,
            CryptoError::Authentication { .. } => ErrorKind::Authentication,
        }
    }

    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        CryptoError::MalformedInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn key_agreement(operation: &str, reason: impl Into<String>) -> Self {
        CryptoError::KeyAgreement {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn cipher(operation: &str, reason: impl Into<String>) -> Self {
        CryptoError::Cipher {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::MalformedInput => "malformed input",
            ErrorKind::KeyAgreement => "key agreement",
            ErrorKind::DigestUnavailable => "digest unavailable",
            ErrorKind::Cipher => "cipher",
            ErrorKind::Authentication => "authentication",
        };
        f.write_str(name)
    }
}

// Conversion from hex decode errors
impl From<hex::FromHexError> for CryptoError {
    fn from(err: hex::FromHexError) -> Self {
        CryptoError::malformed("hex_field", format!("hex decode error: {}", err))
    }
}

// Conversion from k256 errors (elliptic curve operations)
impl From<k256::elliptic_curve::Error> for CryptoError {
    fn from(err: k256::elliptic_curve::Error) -> Self {
        CryptoError::key_agreement("ecdh", format!("k256 error: {}", err))
    }
}
