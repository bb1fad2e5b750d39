// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope configuration
//!
//! Settings are read from a TOML file and/or environment variables, with
//! environment values taking precedence:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `ENVELOPE_CONTEXT_VARIANT` | `ephem-public-key` / `encryption-key` (or `1` / `2`) | `ephem-public-key` |
//! | `ENVELOPE_MAX_SESSION_SECS` | Upper bound on session timeouts | `604800` |
//! | `RUST_LOG` | Log filter for binaries | `info` |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::crypto::ContextVariant;
use crate::session::MAX_SESSION_SECS;

pub const ENV_CONTEXT_VARIANT: &str = "ENVELOPE_CONTEXT_VARIANT";
pub const ENV_MAX_SESSION_SECS: &str = "ENVELOPE_MAX_SESSION_SECS";
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Wire version used for the MAC-covered context field
    pub variant: ContextVariant,
    /// Upper bound on requested session lifetimes, in seconds
    pub max_session_secs: u64,
    /// `tracing_subscriber` filter directive
    pub log_filter: String,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            variant: ContextVariant::default(),
            max_session_secs: MAX_SESSION_SECS,
            log_filter: "info".to_string(),
        }
    }
}

impl EnvelopeConfig {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Self = toml::from_str(&contents)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = env::var(ENV_CONTEXT_VARIANT) {
            self.variant =
                value
                    .parse::<ContextVariant>()
                    .map_err(|e| ConfigError::InvalidValue {
                        name: ENV_CONTEXT_VARIANT.to_string(),
                        reason: e.to_string(),
                    })?;
        }

        if let Ok(value) = env::var(ENV_MAX_SESSION_SECS) {
            self.max_session_secs =
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        name: ENV_MAX_SESSION_SECS.to_string(),
                        reason: e.to_string(),
                    })?;
        }

        if let Ok(value) = env::var(ENV_LOG_FILTER) {
            if !value.trim().is_empty() {
                self.log_filter = value;
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_session_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_session_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_session_secs > MAX_SESSION_SECS {
            warn!(
                "max_session_secs {} exceeds the server limit of {}s",
                self.max_session_secs, MAX_SESSION_SECS
            );
        }
        Ok(())
    }
}
