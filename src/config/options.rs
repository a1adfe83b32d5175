// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session client options

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::FhevmError;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Options recognized by [`SessionClient`](crate::session::SessionClient)
///
/// Deserializes from camelCase JSON; unknown keys are ignored and missing
/// keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientOptions {
    /// Log cache hits, init no-ops and gateway retries at info level
    pub debug: bool,
    /// Total gateway attempts per user decryption (transport failures only)
    pub retry_attempts: u32,
    /// Pause between gateway attempts
    pub retry_delay_ms: u64,
    /// Cache encryption records by (kind, value)
    pub enable_cache: bool,
}

impl ClientOptions {
    /// Load options from environment variables
    ///
    /// `FHEVM_DEBUG`, `FHEVM_RETRY_ATTEMPTS`, `FHEVM_RETRY_DELAY_MS`,
    /// `FHEVM_ENABLE_CACHE`. Unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            debug: env::var("FHEVM_DEBUG")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            retry_attempts: env::var("FHEVM_RETRY_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            retry_delay_ms: env::var("FHEVM_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            enable_cache: env::var("FHEVM_ENABLE_CACHE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    pub fn validate(&self) -> Result<(), FhevmError> {
        if self.retry_attempts == 0 {
            return Err(FhevmError::Configuration(
                "retryAttempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.enable_cache = enabled;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay_ms: u64) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay_ms = delay_ms;
        self
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            debug: false,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            enable_cache: true,
        }
    }
}
