// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the HTTP API binary

use std::env;
use std::net::SocketAddr;

use super::networks::{validate_rpc_url, NetworkInfo};
use super::options::ClientOptions;
use crate::error::FhevmError;

/// Everything the binary needs to assemble a session client and router
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (`API_HOST`, default `127.0.0.1`)
    pub host: String,
    /// Bind port (`API_PORT`, default 8080)
    pub port: u16,
    /// JSON-RPC endpoint used to read the chain id (`RPC_URL`)
    pub rpc_url: Option<String>,
    /// Fixed chain id when no RPC endpoint is configured (`CHAIN_ID`)
    pub chain_id: u64,
    /// Hex private key for the signing wallet (`SIGNER_PRIVATE_KEY`)
    pub signer_private_key: Option<String>,
    /// Seed for the local development engine (`ENGINE_SEED`)
    pub engine_seed: Option<String>,
    /// Base URL of the decryption gateway (`GATEWAY_URL`)
    pub gateway_url: Option<String>,
    /// Gateway request timeout (`GATEWAY_TIMEOUT_MS`)
    pub gateway_timeout_ms: u64,
    pub client: ClientOptions,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            rpc_url: env::var("RPC_URL").ok().filter(|v| !v.is_empty()),
            chain_id: env::var("CHAIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| NetworkInfo::localhost().chain_id),
            signer_private_key: env::var("SIGNER_PRIVATE_KEY").ok().filter(|v| !v.is_empty()),
            engine_seed: env::var("ENGINE_SEED").ok().filter(|v| !v.is_empty()),
            gateway_url: env::var("GATEWAY_URL").ok().filter(|v| !v.is_empty()),
            gateway_timeout_ms: env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            client: ClientOptions::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), FhevmError> {
        self.client.validate()?;
        if let Some(url) = &self.rpc_url {
            validate_rpc_url(url)
                .map_err(|e| FhevmError::Configuration(format!("RPC_URL: {}", e)))?;
        }
        if let Some(url) = &self.gateway_url {
            validate_rpc_url(url)
                .map_err(|e| FhevmError::Configuration(format!("GATEWAY_URL: {}", e)))?;
        }
        if let Some(key) = &self.signer_private_key {
            validate_private_key(key)?;
        }
        if self.gateway_timeout_ms == 0 {
            return Err(FhevmError::Configuration(
                "GATEWAY_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, FhevmError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| FhevmError::Configuration(format!("invalid bind address: {}", e)))
    }
}

/// 64 hex characters, optional `0x` prefix
pub fn validate_private_key(key: &str) -> Result<(), FhevmError> {
    let clean = key.strip_prefix("0x").unwrap_or(key);
    if clean.len() != 64 || !clean.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FhevmError::Configuration(
            "Private key must be a 64-character hex string".to_string(),
        ));
    }
    Ok(())
}
