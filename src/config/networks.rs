// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: Option<String>,
    pub testnet: bool,
}

impl NetworkInfo {
    pub fn sepolia() -> Self {
        NetworkInfo {
            chain_id: 11155111,
            name: "Sepolia".to_string(),
            rpc_url: std::env::var("SEPOLIA_RPC_URL")
                .unwrap_or_else(|_| "https://rpc.sepolia.org".to_string()),
            explorer_url: Some("https://sepolia.etherscan.io".to_string()),
            testnet: true,
        }
    }

    pub fn localhost() -> Self {
        NetworkInfo {
            chain_id: 31337,
            name: "Localhost".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            explorer_url: None,
            testnet: true,
        }
    }
}

/// Networks the client is known to work against
pub fn supported_networks() -> Vec<NetworkInfo> {
    vec![NetworkInfo::sepolia(), NetworkInfo::localhost()]
}

/// Look up a network by its short key (`sepolia`, `localhost`)
pub fn network_by_name(name: &str) -> Option<NetworkInfo> {
    match name.to_lowercase().as_str() {
        "sepolia" => Some(NetworkInfo::sepolia()),
        "localhost" => Some(NetworkInfo::localhost()),
        _ => None,
    }
}

pub fn network_by_chain_id(chain_id: u64) -> Option<NetworkInfo> {
    supported_networks()
        .into_iter()
        .find(|n| n.chain_id == chain_id)
}

/// Accept http, https, ws and wss URLs only
pub fn validate_rpc_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url)
        .map_err(|_| ValidationError::Format("Invalid URL format".to_string()))?;
    match parsed.scheme() {
        "http" | "https" | "ws" | "wss" => Ok(()),
        _ => Err(ValidationError::Format(
            "URL must use http, https, ws, or wss protocol".to_string(),
        )),
    }
}
