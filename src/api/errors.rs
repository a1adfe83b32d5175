// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{FhevmError, ValidationError};

/// Error body: `{success: false, error, errorType, details?}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    Unauthorized(String),
    ServiceUnavailable(String),
    OperationFailed { operation: String, message: String },
    InternalError(String),
}

impl ApiError {
    pub fn validation(field: &str, err: ValidationError) -> Self {
        ApiError::ValidationError {
            field: field.to_string(),
            message: err.to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let mut details = None;
        let (error_type, message) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone()),
            ApiError::ValidationError { field, message } => {
                details = Some(HashMap::from([(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                )]));
                ("validation_error", message.clone())
            }
            ApiError::Unauthorized(msg) => ("unauthorized", msg.clone()),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg.clone()),
            ApiError::OperationFailed { operation, message } => {
                details = Some(HashMap::from([(
                    "operation".to_string(),
                    serde_json::Value::String(operation.clone()),
                )]));
                ("operation_failed", message.clone())
            }
            ApiError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        ErrorResponse {
            success: false,
            error_type: error_type.to_string(),
            error: message,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::OperationFailed { .. } | ApiError::InternalError(_) => 500,
        }
    }
}

impl From<FhevmError> for ApiError {
    fn from(err: FhevmError) -> Self {
        match err {
            FhevmError::Validation(e) => ApiError::validation("value", e),
            FhevmError::Authorization(msg) => ApiError::Unauthorized(msg),
            FhevmError::Initialization(_) => ApiError::ServiceUnavailable(err.to_string()),
            FhevmError::Configuration(_) => ApiError::InternalError(err.to_string()),
            other => ApiError::OperationFailed {
                operation: other.kind().trim_end_matches("_error").to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::OperationFailed { operation, message } => {
                write!(f, "{} failed: {}", operation, message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
