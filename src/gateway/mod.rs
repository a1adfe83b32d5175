// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decryption gateway seam
//!
//! The gateway is the remote service trusted to decrypt a handle once it
//! has checked the user's signature. The client only defines the request it
//! sends and the response it expects; the transport is pluggable.
//!
//! Transports report a remote *decision* through [`GatewayResponse`] and
//! only use `Err` for transport failures, which the client may retry.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::DecryptedValue;

pub use http::HttpGateway;

/// Signed request for user decryption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptionRequest {
    pub contract_address: String,
    pub handle: String,
    pub signature: String,
    /// Address the signature was produced for
    pub user_address: String,
}

/// Unsigned request for a publicly decryptable handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDecryptionRequest {
    pub handle: String,
}

/// Wire response: `{value, success, error?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayResponse {
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            value: Some(value),
            success: true,
            error: None,
        }
    }

    pub fn declined(reason: impl Into<String>) -> Self {
        Self {
            value: None,
            success: false,
            error: Some(reason.into()),
        }
    }

    /// Interpret the response as a plaintext or a decline
    pub fn into_value(self) -> Result<DecryptedValue, GatewayError> {
        if !self.success {
            return Err(GatewayError::Declined(
                self.error
                    .unwrap_or_else(|| "gateway declined request".to_string()),
            ));
        }
        let value = self
            .value
            .ok_or_else(|| GatewayError::InvalidResponse("missing value".to_string()))?;
        DecryptedValue::from_json(&value).ok_or_else(|| {
            GatewayError::InvalidResponse(format!("unrecognized plaintext: {}", value))
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway answered and refused (unauthorized, unknown handle, ...)
    #[error("Gateway declined: {0}")]
    Declined(String),

    /// The request did not complete (network, timeout, 5xx)
    #[error("Gateway transport error: {0}")]
    Transport(String),

    /// The gateway answered with something that is not a valid response
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn user_decrypt(
        &self,
        request: &UserDecryptionRequest,
    ) -> Result<GatewayResponse, GatewayError>;

    async fn public_decrypt(
        &self,
        request: &PublicDecryptionRequest,
    ) -> Result<GatewayResponse, GatewayError>;
}

/// Default transport when no gateway is configured; declines everything
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGateway;

pub const GATEWAY_NOT_CONFIGURED: &str = "Gateway integration not configured";

#[async_trait]
impl GatewayTransport for UnavailableGateway {
    async fn user_decrypt(
        &self,
        _request: &UserDecryptionRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        Ok(GatewayResponse::declined(GATEWAY_NOT_CONFIGURED))
    }

    async fn public_decrypt(
        &self,
        _request: &PublicDecryptionRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        Ok(GatewayResponse::declined(GATEWAY_NOT_CONFIGURED))
    }
}
