// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Router-level tests for the FHE HTTP API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use ethers::signers::LocalWallet;
use fhevm_session::api::create_router;
use fhevm_session::{
    ClientOptions, LocalEngineLoader, SessionClient, StaticChain, UnavailableGateway,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const CONTRACT: &str = "0x1234567890123456789012345678901234567890";

fn client() -> SessionClient {
    SessionClient::new(
        Arc::new(LocalEngineLoader::new([9u8; 32])),
        Arc::new(UnavailableGateway),
        Arc::new(StaticChain(31337)),
        ClientOptions::default(),
    )
}

fn router() -> Router {
    create_router(Arc::new(client()))
}

fn router_with_signer() -> Router {
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    create_router(Arc::new(client().with_signer(Arc::new(wallet))))
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(router(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["session"], "uninitialized");
}

#[tokio::test]
async fn test_status_lists_endpoints() {
    let (status, body) = call(router(), "GET", "/api/fhe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "operational");
    assert_eq!(body["endpoints"]["encrypt"], "/api/fhe/encrypt");
    assert_eq!(body["endpoints"]["decrypt"], "/api/fhe/decrypt");
    assert_eq!(body["endpoints"]["compute"], "/api/fhe/compute");
    assert_eq!(body["version"]["version"], "0.3.0");
    assert!(body["version"]["features"]
        .as_array()
        .unwrap()
        .contains(&json!("user-decryption")));
}

#[tokio::test]
async fn test_encrypt() {
    let (status, body) = call(
        router(),
        "POST",
        "/api/fhe/encrypt",
        Some(json!({ "value": 42, "dataKind": "uint8" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["encrypted"]["dataKind"], "uint8");
    assert!(body["encrypted"]["data"].as_str().unwrap().starts_with("0x"));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_encrypt_accepts_type_alias() {
    let (status, body) = call(
        router(),
        "POST",
        "/api/fhe/encrypt",
        Some(json!({ "value": true, "type": "bool" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["encrypted"]["dataKind"], "bool");
}

#[tokio::test]
async fn test_encrypt_rejects_bad_input() {
    let cases = [
        (json!({ "value": 300, "dataKind": "uint8" }), "validation_error"),
        (json!({ "value": "0x12", "dataKind": "address" }), "validation_error"),
        (json!({ "value": 1, "dataKind": "uint128" }), "validation_error"),
        (json!({ "dataKind": "uint8" }), "invalid_request"),
        (json!({ "value": 1 }), "invalid_request"),
    ];

    for (request, error_type) in cases {
        let (status, body) = call(router(), "POST", "/api/fhe/encrypt", Some(request.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", request);
        assert_eq!(body["success"], false);
        assert_eq!(body["errorType"], error_type, "{}", request);
    }
}

#[tokio::test]
async fn test_public_decrypt_round_trip() {
    let app = router();
    let (_, encrypted) = call(
        app.clone(),
        "POST",
        "/api/fhe/encrypt",
        Some(json!({ "value": "1234", "dataKind": "uint32" })),
    )
    .await;
    let handle = encrypted["encrypted"]["data"].as_str().unwrap();

    let (status, body) = call(
        app,
        "POST",
        "/api/fhe/decrypt",
        Some(json!({ "handle": handle, "isPublic": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["decrypted"], 1234);
    assert_eq!(body["mode"], "public");
}

#[tokio::test]
async fn test_public_decrypt_failure_is_reported_in_body() {
    let (status, body) = call(
        router(),
        "POST",
        "/api/fhe/decrypt",
        Some(json!({ "handle": "0xdeadbeef", "isPublic": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some());
    assert!(body.get("decrypted").is_none());
}

#[tokio::test]
async fn test_decrypt_request_validation() {
    let handle = format!("0x{}", "ab".repeat(32));

    let (status, body) = call(router(), "POST", "/api/fhe/decrypt", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Handle is required");

    let (status, body) = call(
        router(),
        "POST",
        "/api/fhe/decrypt",
        Some(json!({ "handle": handle })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Contract address is required for user decryption");

    let (status, body) = call(
        router(),
        "POST",
        "/api/fhe/decrypt",
        Some(json!({ "handle": handle, "contractAddress": "0x1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "contractAddress");
}

#[tokio::test]
async fn test_user_decrypt_without_signer_is_unauthorized() {
    let (status, body) = call(
        router(),
        "POST",
        "/api/fhe/decrypt",
        Some(json!({ "handle": format!("0x{}", "ab".repeat(32)), "contractAddress": CONTRACT })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errorType"], "unauthorized");
}

#[tokio::test]
async fn test_user_decrypt_without_gateway_is_declined() {
    let (status, body) = call(
        router_with_signer(),
        "POST",
        "/api/fhe/decrypt",
        Some(json!({ "handle": format!("0x{}", "ab".repeat(32)), "contractAddress": CONTRACT })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["mode"], "user");
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn test_compute_submission() {
    let (status, body) = call(
        router(),
        "POST",
        "/api/fhe/compute",
        Some(json!({ "operation": "add", "operands": ["0x01", "0x02"], "contractAddress": CONTRACT })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["operation"], "add");
    assert_eq!(body["operandCount"], 2);
    assert_eq!(body["message"], "Computation submitted to smart contract");
}

#[tokio::test]
async fn test_compute_rejects_bad_submissions() {
    for request in [
        json!({ "operands": ["0x01", "0x02"] }),
        json!({ "operation": "sqrt", "operands": ["0x01", "0x02"] }),
        json!({ "operation": "add", "operands": ["0x01"] }),
    ] {
        let (status, body) = call(router(), "POST", "/api/fhe/compute", Some(request.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", request);
        assert_eq!(body["errorType"], "invalid_request");
    }
}
