// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod types;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::ApiState;
pub use http_server::{create_router, start_server};
pub use types::{
    DecryptMode, DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse,
    EncryptedPayload, HealthResponse, StatusResponse,
};
