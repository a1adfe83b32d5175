// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON-over-HTTP gateway transport
//!
//! - `POST {base}/decrypt/user`   body: [`UserDecryptionRequest`]
//! - `POST {base}/decrypt/public` body: [`PublicDecryptionRequest`]
//!
//! Both return a [`GatewayResponse`]. 5xx answers and network failures are
//! transport errors; 4xx answers are declines.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    GatewayError, GatewayResponse, GatewayTransport, PublicDecryptionRequest,
    UserDecryptionRequest,
};

pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<GatewayResponse, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            warn!("Gateway {} answered {}", url, status);
            return Err(GatewayError::Transport(format!("gateway returned {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match serde_json::from_str::<GatewayResponse>(&text) {
            Ok(parsed) if status.is_success() => Ok(parsed),
            // 4xx with a structured body: keep the gateway's own reason
            Ok(parsed) => Ok(GatewayResponse {
                success: false,
                ..parsed
            }),
            Err(_) if status.is_client_error() => Ok(GatewayResponse::declined(format!(
                "gateway returned {}",
                status
            ))),
            Err(e) => Err(GatewayError::InvalidResponse(e.to_string())),
        }
    }
}

#[async_trait]
impl GatewayTransport for HttpGateway {
    async fn user_decrypt(
        &self,
        request: &UserDecryptionRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        self.post("/decrypt/user", request).await
    }

    async fn public_decrypt(
        &self,
        request: &PublicDecryptionRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        self.post("/decrypt/public", request).await
    }
}
