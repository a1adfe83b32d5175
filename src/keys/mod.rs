// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for the external key-management endpoint
//!
//! - `GET  {base}?contractAddress=0x..` -> `{success, publicKey, keyId}`
//! - `POST {base}` with `{action, contractAddress?}` -> `{success, ...}`
//!
//! Actions report plain success or failure; transport and server errors are
//! logged and collapse to `false`.

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::codec::validate_address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyInfo {
    pub public_key: String,
    pub key_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    Generate,
    Register,
    Revoke,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyActionRequest {
    pub action: KeyAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyServiceResponse {
    pub success: bool,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub struct KeyServiceClient {
    client: Client,
    endpoint: String,
}

impl KeyServiceClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Retrieve the public key registered for `contract_address`
    pub async fn fetch_public_key(&self, contract_address: &str) -> Result<PublicKeyInfo> {
        self.try_fetch_public_key(contract_address)
            .await
            .map_err(|e| anyhow!("Failed to retrieve public key: {}", e))
    }

    async fn try_fetch_public_key(&self, contract_address: &str) -> Result<PublicKeyInfo> {
        validate_address(contract_address)?;

        let response: KeyServiceResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("contractAddress", contract_address)])
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(anyhow!(response
                .error
                .unwrap_or_else(|| "key service reported failure".to_string())));
        }
        match (response.public_key, response.key_id) {
            (Some(public_key), Some(key_id)) => Ok(PublicKeyInfo { public_key, key_id }),
            _ => Err(anyhow!("response is missing publicKey or keyId")),
        }
    }

    pub async fn register_key(&self, contract_address: &str) -> bool {
        self.action(KeyAction::Register, Some(contract_address)).await
    }

    pub async fn revoke_key(&self, contract_address: &str) -> bool {
        self.action(KeyAction::Revoke, Some(contract_address)).await
    }

    pub async fn generate_key_pair(&self) -> bool {
        self.action(KeyAction::Generate, None).await
    }

    async fn action(&self, action: KeyAction, contract_address: Option<&str>) -> bool {
        let request = KeyActionRequest {
            action,
            contract_address: contract_address.map(str::to_string),
        };

        let result: Result<KeyServiceResponse> = async {
            Ok(self
                .client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await?
                .json()
                .await?)
        }
        .await;

        match result {
            Ok(response) => {
                debug!("Key action {:?}: success={}", action, response.success);
                response.success
            }
            Err(e) => {
                warn!("Key action {:?} failed: {}", action, e);
                false
            }
        }
    }
}
