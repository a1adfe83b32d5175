// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::DataKind;
use crate::engine::DecryptedValue;

/// Result of a successful encryption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionRecord {
    /// `0x`-prefixed ciphertext handle
    pub data: String,
    /// Canonical string form of the plaintext
    pub original_value: String,
    pub data_kind: DataKind,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of one decryption request
///
/// Decryption failures are values, not errors: a batch keeps going when one
/// slot fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DecryptionResult {
    Decrypted { value: DecryptedValue },
    Failed { error: String },
}

impl DecryptionResult {
    pub fn failed(error: impl fmt::Display) -> Self {
        DecryptionResult::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DecryptionResult::Decrypted { .. })
    }

    pub fn value(&self) -> Option<&DecryptedValue> {
        match self {
            DecryptionResult::Decrypted { value } => Some(value),
            DecryptionResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DecryptionResult::Decrypted { .. } => None,
            DecryptionResult::Failed { error } => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DecryptionMode {
    Public,
    #[serde(rename_all = "camelCase")]
    User { contract_address: String },
}

/// One entry of a batch decryption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionRequest {
    pub handle: String,
    #[serde(flatten)]
    pub mode: DecryptionMode,
}

impl DecryptionRequest {
    pub fn public(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            mode: DecryptionMode::Public,
        }
    }

    pub fn user(contract_address: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            mode: DecryptionMode::User {
                contract_address: contract_address.into(),
            },
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self.mode, DecryptionMode::Public)
    }
}

/// Lifecycle of the engine inside one client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Uninitialized => "uninitialized",
            SessionStatus::Initializing => "initializing",
            SessionStatus::Ready => "ready",
            SessionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
