// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto engine seam
//!
//! The session client never performs encryption itself. It obtains a
//! [`CryptoEngine`] from an [`EngineLoader`] exactly once and calls the
//! kind-specific primitives on it. Engines are opaque: handles they return
//! are carried as hex strings and never decomposed by the client.
//!
//! [`LocalEngine`] is a self-contained development engine; production
//! deployments plug in a loader for their FHE library.

pub mod local;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use local::{LocalEngine, LocalEngineLoader};

/// Scalar encryption primitives plus public decryption
#[async_trait]
pub trait CryptoEngine: Send + Sync {
    /// Engine name for logging
    fn name(&self) -> &'static str;

    /// Encrypt an unsigned integer of the given bit width (8, 16, 32, 64)
    fn encrypt_uint(&self, bits: u32, value: u64) -> Result<Vec<u8>>;

    /// Encrypt a `0x`-prefixed 20-byte address
    fn encrypt_address(&self, address: &str) -> Result<Vec<u8>>;

    /// Encrypt a boolean
    fn encrypt_bool(&self, value: bool) -> Result<Vec<u8>>;

    /// Decrypt a publicly decryptable handle
    async fn decrypt(&self, handle: &str) -> Result<DecryptedValue>;
}

/// Loads an engine; may suspend (e.g. fetching key material) and may fail
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn CryptoEngine>>;
}

/// Plaintext recovered from a handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecryptedValue {
    Bool(bool),
    Uint(u64),
    Address(String),
}

impl DecryptedValue {
    /// Interpret a JSON value returned by a remote service
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(DecryptedValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_u64().map(DecryptedValue::Uint),
            serde_json::Value::String(s) => {
                if crate::codec::validate_address(s).is_ok() {
                    Some(DecryptedValue::Address(s.to_lowercase()))
                } else {
                    s.trim().parse::<u64>().ok().map(DecryptedValue::Uint)
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for DecryptedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecryptedValue::Bool(b) => write!(f, "{}", b),
            DecryptedValue::Uint(n) => write!(f, "{}", n),
            DecryptedValue::Address(a) => f.write_str(a),
        }
    }
}
