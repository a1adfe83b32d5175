// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    compute_handler, decrypt_handler, encrypt_handler, health_handler, status_handler, ApiState,
};
use crate::session::SessionClient;

pub fn create_router(client: Arc<SessionClient>) -> Router {
    let state = ApiState { client };

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // FHE operations
        .route("/api/fhe", get(status_handler))
        .route("/api/fhe/encrypt", post(encrypt_handler))
        .route("/api/fhe/decrypt", post(decrypt_handler))
        .route("/api/fhe/compute", post(compute_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until ctrl-c
pub async fn start_server(client: Arc<SessionClient>, addr: SocketAddr) -> Result<()> {
    let app = create_router(client);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
