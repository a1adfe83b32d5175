// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the session client
//!
//! Two families of failure are kept apart:
//!
//! - **Precondition failures** (no engine, no signer, malformed input,
//!   rejected signature) are returned as `Err(FhevmError)`.
//! - **Decryption outcomes** (gateway decline, bad handle, transport
//!   failure) are reported in-band through
//!   [`DecryptionResult::Failed`](crate::session::DecryptionResult).

use thiserror::Error;

/// Input validation failures raised by the type codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is well-formed but outside the range of its data kind
    #[error("range error: {0}")]
    Range(String),

    /// Value has the wrong shape for its data kind (or the kind is unknown)
    #[error("format error: {0}")]
    Format(String),
}

/// Errors surfaced by [`SessionClient`](crate::session::SessionClient) and
/// the signature protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FhevmError {
    /// The crypto engine could not be loaded
    #[error("Failed to initialize fhEVM: {0}")]
    Initialization(String),

    /// Validation or engine failure while encrypting
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failure that could not be reported in-band
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// The signer rejected or failed to produce a typed-data signature
    #[error("Signature generation failed: {0}")]
    Signature(String),

    /// User decryption attempted without a configured signer
    #[error("Authorization required: {0}")]
    Authorization(String),

    /// Standalone validation failure (outside of `encrypt`)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid client or server configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl FhevmError {
    /// Short machine-readable kind, used by the HTTP layer
    pub fn kind(&self) -> &'static str {
        match self {
            FhevmError::Initialization(_) => "initialization_error",
            FhevmError::Encryption(_) => "encryption_error",
            FhevmError::Decryption(_) => "decryption_error",
            FhevmError::Signature(_) => "signature_error",
            FhevmError::Authorization(_) => "authorization_error",
            FhevmError::Validation(_) => "validation_error",
            FhevmError::Configuration(_) => "configuration_error",
        }
    }
}
