// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end user decryption against a signature-checking HTTP gateway

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use ethers::signers::LocalWallet;
use fhevm_session::crypto::{build_domain, parse_address, verify};
use fhevm_session::gateway::{HttpGateway, UserDecryptionRequest};
use fhevm_session::{
    ClientOptions, DecryptedValue, LocalEngineLoader, SessionClient, StaticChain,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const CHAIN_ID: u64 = 8009;
const CONTRACT: &str = "0x00000000000000000000000000000000000000aa";

#[derive(Clone)]
struct GatewayState {
    requests: Arc<AtomicUsize>,
    fail_first: Arc<AtomicUsize>,
}

async fn user_route(
    State(state): State<GatewayState>,
    Json(request): Json<UserDecryptionRequest>,
) -> (StatusCode, Json<Value>) {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if state
        .fail_first
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        return (StatusCode::BAD_GATEWAY, Json(json!({})));
    }

    let (Ok(contract), Ok(user)) = (
        parse_address(&request.contract_address),
        parse_address(&request.user_address),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "bad addresses" })),
        );
    };
    let domain = build_domain(CHAIN_ID, contract);
    if !verify(
        &request.signature,
        &domain,
        &request.handle,
        user,
        &request.user_address,
    ) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "error": "invalid signature" })),
        );
    }
    (StatusCode::OK, Json(json!({ "success": true, "value": 4242 })))
}

async fn spawn_gateway(fail_first: usize) -> (String, Arc<AtomicUsize>) {
    let requests = Arc::new(AtomicUsize::new(0));
    let state = GatewayState {
        requests: requests.clone(),
        fail_first: Arc::new(AtomicUsize::new(fail_first)),
    };
    let router = Router::new()
        .route("/decrypt/user", post(user_route))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{}", addr), requests)
}

fn client(base: &str, chain_id: u64, options: ClientOptions) -> SessionClient {
    SessionClient::new(
        Arc::new(LocalEngineLoader::random()),
        Arc::new(HttpGateway::new(base, Duration::from_secs(5)).unwrap()),
        Arc::new(StaticChain(chain_id)),
        options,
    )
}

#[tokio::test]
async fn test_gateway_accepts_valid_signature() {
    let (base, requests) = spawn_gateway(0).await;
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    let client = client(&base, CHAIN_ID, ClientOptions::default())
        .with_signer(Arc::new(wallet));

    let handle = format!("0x{}", "5e".repeat(32));
    let result = client.user_decrypt(CONTRACT, &handle).await.unwrap();

    assert_eq!(result.value(), Some(&DecryptedValue::Uint(4242)));
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_gateway_rejects_signature_for_wrong_chain() {
    let (base, _) = spawn_gateway(0).await;
    let client = client(&base, 1, ClientOptions::default())
        .with_signer(Arc::new(LocalWallet::new(&mut rand::thread_rng())));

    let handle = format!("0x{}", "5e".repeat(32));
    let result = client.user_decrypt(CONTRACT, &handle).await.unwrap();

    assert!(result.error().unwrap().contains("invalid signature"));
}

#[tokio::test]
async fn test_gateway_server_errors_are_retried() {
    let (base, requests) = spawn_gateway(2).await;
    let client = client(&base, CHAIN_ID, ClientOptions::default().with_retry(3, 5))
        .with_signer(Arc::new(LocalWallet::new(&mut rand::thread_rng())));

    let handle = format!("0x{}", "77".repeat(32));
    let result = client.user_decrypt(CONTRACT, &handle).await.unwrap();

    assert!(result.is_success());
    assert_eq!(requests.load(Ordering::SeqCst), 3);
}
