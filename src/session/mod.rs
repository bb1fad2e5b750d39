// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session Payloads
//!
//! Wire structures for storing a session share with a remote session server
//! and reading it back. The server only ever sees ciphertext, the tag and a
//! signature by the session key; transport is up to the caller.
//!
//! **Request format** (JSON):
//! ```text
//! { "key": "04…", "data": "<ShareMetadata JSON>", "signature": "<DER hex>", "timeout": 86400 }
//! ```

use serde::{Deserialize, Serialize};
use std::string::FromUtf8Error;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::EnvelopeConfig;
use crate::crypto::{
    ephemeral_public_key_hex, sign_payload, ContextVariant, CryptoError, EnvelopeScheme,
};

/// Longest session lifetime the server accepts, in seconds (7 days)
pub const MAX_SESSION_SECS: u64 = 7 * 86400;

/// Timeout sent when invalidating a session
pub const INVALIDATION_TIMEOUT_SECS: u64 = 1;

/// Encrypted share as stored by the session server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMetadata {
    /// 16-byte IV, hex
    pub iv: String,
    /// Uncompressed ephemeral public key, `04` prefixed hex
    pub ephem_public_key: String,
    /// AES-256-CBC ciphertext, hex
    pub ciphertext: String,
    /// HMAC-SHA256 tag over the envelope, hex
    pub mac: String,
}

/// Body of a create or invalidate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequestBody {
    /// Session public key, `04` prefixed hex
    pub key: String,
    /// Serialized [`ShareMetadata`]
    pub data: String,
    /// DER-encoded ECDSA signature over Keccak-256 of `data`, hex
    pub signature: String,
    /// Session lifetime in seconds
    #[serde(default)]
    pub timeout: u64,
}

impl SessionRequestBody {
    /// Parse the embedded share metadata
    pub fn metadata(&self) -> Result<ShareMetadata, SessionError> {
        Ok(serde_json::from_str(&self.data)?)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Session metadata JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decrypted session data is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Encrypt `data` for storage under the given session key
///
/// The session key's own public point is the ephemeral key of the
/// envelope, so whoever holds the session key can open it later.
///
/// # Arguments
///
/// * `session_key_hex` - Session private key
/// * `data` - Session data to protect
/// * `session_secs` - Requested lifetime, clamped to `config.max_session_secs`
/// * `iv_hex` - Fresh 16-byte IV (see `crypto::random_iv_hex`)
/// * `config` - Wire version and limits
pub fn seal_session(
    session_key_hex: &str,
    data: &str,
    session_secs: u64,
    iv_hex: &str,
    config: &EnvelopeConfig,
) -> Result<SessionRequestBody, SessionError> {
    let ephem_public_key = ephemeral_public_key_hex(session_key_hex)?;
    let scheme = EnvelopeScheme::new(session_key_hex, &ephem_public_key, iv_hex, config.variant)?;
    let sealed = scheme.encrypt_and_sign(data.as_bytes())?;

    let metadata = ShareMetadata {
        iv: iv_hex.to_lowercase(),
        ephem_public_key: ephem_public_key.clone(),
        ciphertext: sealed.ciphertext_hex,
        mac: sealed.tag_hex,
    };
    let timeout = session_secs.min(config.max_session_secs);

    let body = signed_request(session_key_hex, ephem_public_key, &metadata, timeout)?;
    info!(
        "Session payload sealed (wire version {}, timeout: {}s)",
        config.variant.wire_version(),
        timeout
    );
    Ok(body)
}

/// Verify and decrypt a stored share
pub fn open_session(
    session_key_hex: &str,
    metadata: &ShareMetadata,
    variant: ContextVariant,
) -> Result<String, SessionError> {
    let scheme = EnvelopeScheme::new(
        session_key_hex,
        &metadata.ephem_public_key,
        &metadata.iv,
        variant,
    )?;
    let plaintext = scheme.decrypt_and_verify(&metadata.ciphertext, &metadata.mac)?;
    debug!("Session payload opened ({} bytes)", plaintext.len());
    Ok(String::from_utf8(plaintext)?)
}

/// Build the request that tells the server to drop a session
///
/// Re-uses the stored IV and ephemeral key and seals an empty payload.
pub fn invalidation_request(
    session_key_hex: &str,
    stored: &ShareMetadata,
    variant: ContextVariant,
) -> Result<SessionRequestBody, SessionError> {
    let scheme = EnvelopeScheme::new(session_key_hex, &stored.ephem_public_key, &stored.iv, variant)?;
    let sealed = scheme.encrypt_and_sign(b"")?;

    let metadata = ShareMetadata {
        iv: stored.iv.clone(),
        ephem_public_key: stored.ephem_public_key.clone(),
        ciphertext: sealed.ciphertext_hex,
        mac: sealed.tag_hex,
    };
    let key = ephemeral_public_key_hex(session_key_hex)?;

    let body = signed_request(session_key_hex, key, &metadata, INVALIDATION_TIMEOUT_SECS)?;
    info!("Session invalidation request built");
    Ok(body)
}

fn signed_request(
    session_key_hex: &str,
    key: String,
    metadata: &ShareMetadata,
    timeout: u64,
) -> Result<SessionRequestBody, SessionError> {
    let data = serde_json::to_string(metadata)?;
    let signature = sign_payload(session_key_hex, &data)?;
    Ok(SessionRequestBody {
        key,
        data,
        signature,
        timeout,
    })
}
