// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::config::EnvelopeConfig;
use crate::crypto::{
    ephemeral_public_key_hex, random_iv_hex, ContextVariant, EnvelopeScheme, SealedEnvelope,
};
use crate::session::{open_session, seal_session, ShareMetadata};

/// Arguments for the seal command
#[derive(Args, Debug)]
pub struct SealArgs {
    /// Session private key (can also be set via SESSION_PRIVATE_KEY env var)
    #[arg(long, env = "SESSION_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Session data to encrypt
    #[arg(long)]
    pub data: String,

    /// Requested session lifetime in seconds
    #[arg(long, default_value_t = 86400)]
    pub session_secs: u64,

    /// IV as 32 hex characters (random if omitted)
    #[arg(long)]
    pub iv: Option<String>,

    /// Override the configured context variant
    #[arg(long)]
    pub variant: Option<ContextVariant>,
}

/// Arguments for the open command
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Session private key (can also be set via SESSION_PRIVATE_KEY env var)
    #[arg(long, env = "SESSION_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Share metadata JSON
    #[arg(long, conflicts_with = "metadata_file")]
    pub metadata: Option<String>,

    /// File holding share metadata JSON
    #[arg(long, conflicts_with = "metadata")]
    pub metadata_file: Option<PathBuf>,

    /// Override the configured context variant
    #[arg(long)]
    pub variant: Option<ContextVariant>,
}

/// Arguments for the encrypt command
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Private key (can also be set via SESSION_PRIVATE_KEY env var)
    #[arg(long, env = "SESSION_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Peer ephemeral public key, 130 hex characters
    #[arg(long)]
    pub peer_public_key: String,

    /// IV as 32 hex characters (random if omitted)
    #[arg(long)]
    pub iv: Option<String>,

    /// UTF-8 data to encrypt
    #[arg(long)]
    pub data: String,

    /// Override the configured context variant
    #[arg(long)]
    pub variant: Option<ContextVariant>,
}

/// Arguments for the decrypt command
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Private key (can also be set via SESSION_PRIVATE_KEY env var)
    #[arg(long, env = "SESSION_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Peer ephemeral public key, 130 hex characters
    #[arg(long)]
    pub peer_public_key: String,

    /// IV as 32 hex characters
    #[arg(long)]
    pub iv: String,

    /// Ciphertext hex
    #[arg(long)]
    pub ciphertext: String,

    /// HMAC tag hex
    #[arg(long)]
    pub tag: String,

    /// Override the configured context variant
    #[arg(long)]
    pub variant: Option<ContextVariant>,
}

/// Arguments for the public-key command
#[derive(Args, Debug)]
pub struct PublicKeyArgs {
    /// Private key (can also be set via SESSION_PRIVATE_KEY env var)
    #[arg(long, env = "SESSION_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

#[derive(serde::Serialize)]
struct EncryptOutput {
    iv: String,
    ephem_public_key: String,
    #[serde(flatten)]
    sealed: SealedEnvelope,
}

pub fn seal(args: SealArgs, config: &EnvelopeConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    let iv = args.iv.unwrap_or_else(random_iv_hex);

    let body = seal_session(&args.private_key, &args.data, args.session_secs, &iv, &config)
        .context("Failed to seal session data")?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

pub fn open(args: OpenArgs, config: &EnvelopeConfig) -> Result<()> {
    let json = match (args.metadata, args.metadata_file) {
        (Some(json), _) => json,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => return Err(anyhow!("Either --metadata or --metadata-file is required")),
    };
    let metadata: ShareMetadata =
        serde_json::from_str(&json).context("Share metadata is not valid JSON")?;

    let variant = args.variant.unwrap_or(config.variant);
    let share = open_session(&args.private_key, &metadata, variant)
        .context("Failed to open session share")?;

    println!("{}", share);
    Ok(())
}

pub fn encrypt(args: EncryptArgs, config: &EnvelopeConfig) -> Result<()> {
    let variant = args.variant.unwrap_or(config.variant);
    let iv = args.iv.unwrap_or_else(random_iv_hex);

    let scheme = EnvelopeScheme::new(&args.private_key, &args.peer_public_key, &iv, variant)
        .context("Failed to set up envelope")?;
    let sealed = scheme.encrypt_and_sign(args.data.as_bytes())?;
    info!("Encrypted {} bytes (wire version {})", args.data.len(), variant.wire_version());

    let output = EncryptOutput {
        iv,
        ephem_public_key: args.peer_public_key,
        sealed,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn decrypt(args: DecryptArgs, config: &EnvelopeConfig) -> Result<()> {
    let variant = args.variant.unwrap_or(config.variant);

    let scheme = EnvelopeScheme::new(&args.private_key, &args.peer_public_key, &args.iv, variant)
        .context("Failed to set up envelope")?;
    let plaintext = scheme
        .decrypt_and_verify(&args.ciphertext, &args.tag)
        .map_err(|e| anyhow!("Decryption refused ({})", e.kind()))?;

    println!("{}", String::from_utf8_lossy(&plaintext));
    Ok(())
}

pub fn public_key(args: PublicKeyArgs) -> Result<()> {
    println!("{}", ephemeral_public_key_hex(&args.private_key)?);
    Ok(())
}
