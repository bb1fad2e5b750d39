// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EnvelopeConfig;

/// Session envelope CLI
#[derive(Parser, Debug)]
#[command(name = "envelope-cli")]
#[command(version)]
#[command(about = "Encrypt, tag and open session envelopes on secp256k1", long_about = None)]
pub struct Cli {
    /// Optional TOML config file (environment variables still override it)
    #[arg(long, global = true, env = "ENVELOPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encrypt session data and print the signed request body
    Seal(commands::SealArgs),

    /// Verify and decrypt stored share metadata
    Open(commands::OpenArgs),

    /// Encrypt raw data against a peer ephemeral key
    Encrypt(commands::EncryptArgs),

    /// Verify a tag and decrypt raw ciphertext
    Decrypt(commands::DecryptArgs),

    /// Print the uncompressed public key of a private key
    PublicKey(commands::PublicKeyArgs),
}

impl Cli {
    pub fn load_config(&self) -> Result<EnvelopeConfig> {
        let config = match &self.config {
            Some(path) => EnvelopeConfig::from_file(path)?,
            None => EnvelopeConfig::from_env()?,
        };
        Ok(config)
    }
}

/// Execute CLI command
pub fn execute(cli: Cli, config: &EnvelopeConfig) -> Result<()> {
    match cli.command {
        Commands::Seal(args) => commands::seal(args, config),
        Commands::Open(args) => commands::open(args, config),
        Commands::Encrypt(args) => commands::encrypt(args, config),
        Commands::Decrypt(args) => commands::decrypt(args, config),
        Commands::PublicKey(args) => commands::public_key(args),
    }
}
