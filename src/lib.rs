// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod crypto;
pub mod session;

// Re-export main types
pub use config::{ConfigError, EnvelopeConfig};
pub use crypto::{ContextVariant, CryptoError, EnvelopeScheme, ErrorKind, SealedEnvelope};
pub use session::{
    invalidation_request, open_session, seal_session, SessionError, SessionRequestBody,
    ShareMetadata,
};
