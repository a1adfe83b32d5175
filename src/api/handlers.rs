// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{debug, info};

use super::errors::ApiError;
use super::types::{
    DecryptMode, DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse,
    EncryptedPayload, EndpointList, HealthResponse, StatusResponse,
};
use crate::codec::{validate, validate_address, DataKind};
use crate::compute::{submit, ComputeAck, ComputeRequest};
use crate::session::SessionClient;
use crate::version::{get_version_info, VERSION_NUMBER};

#[derive(Clone)]
pub struct ApiState {
    pub client: Arc<SessionClient>,
}

pub async fn health_handler(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION_NUMBER.to_string(),
        session: state.client.status().to_string(),
    })
}

pub async fn status_handler(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "operational".to_string(),
        message: "FHE operations API is running".to_string(),
        session: state.client.status().to_string(),
        version: get_version_info(),
        endpoints: EndpointList {
            encrypt: "/api/fhe/encrypt".to_string(),
            decrypt: "/api/fhe/decrypt".to_string(),
            compute: "/api/fhe/compute".to_string(),
        },
    })
}

pub async fn encrypt_handler(
    State(state): State<ApiState>,
    Json(request): Json<EncryptRequest>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let value = request
        .value
        .ok_or_else(|| ApiError::InvalidRequest("Value is required".to_string()))?;
    let kind: DataKind = request
        .data_kind
        .ok_or_else(|| {
            ApiError::InvalidRequest(
                "Type is required (uint8, uint16, uint32, uint64, address, bool)".to_string(),
            )
        })?
        .parse()
        .map_err(|e| ApiError::validation("dataKind", e))?;

    // Reject bad input as 400 before it reaches the client
    validate(&value, kind).map_err(|e| ApiError::validation("value", e))?;

    let record = state.client.encrypt(&value, kind).await?;
    debug!("Encrypted {} via API", kind);

    Ok(Json(EncryptResponse {
        success: true,
        encrypted: Some(EncryptedPayload {
            data: record.data,
            data_kind: record.data_kind,
        }),
        error: None,
    }))
}

pub async fn decrypt_handler(
    State(state): State<ApiState>,
    Json(request): Json<DecryptRequest>,
) -> Result<Json<DecryptResponse>, ApiError> {
    let handle = request
        .handle
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("Handle is required".to_string()))?;

    let (mode, result) = if request.is_public {
        (DecryptMode::Public, state.client.public_decrypt(&handle).await?)
    } else {
        let contract = request.contract_address.ok_or_else(|| {
            ApiError::InvalidRequest(
                "Contract address is required for user decryption".to_string(),
            )
        })?;
        validate_address(&contract).map_err(|e| ApiError::validation("contractAddress", e))?;
        (
            DecryptMode::User,
            state.client.user_decrypt(&contract, &handle).await?,
        )
    };

    info!(
        "Decrypt request ({:?}): success={}",
        mode,
        result.is_success()
    );
    Ok(Json(DecryptResponse {
        success: result.is_success(),
        decrypted: result.value().cloned(),
        mode,
        error: result.error().map(str::to_string),
    }))
}

pub async fn compute_handler(
    Json(request): Json<ComputeRequest>,
) -> Result<Json<ComputeAck>, ApiError> {
    submit(&request)
        .map(Json)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))
}
