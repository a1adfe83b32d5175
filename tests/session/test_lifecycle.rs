// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Engine initialization: laziness, single-flight, failure and retry

use super::helpers::{client_with, CountingLoader, ScriptedGateway};
use fhevm_session::gateway::GatewayResponse;
use fhevm_session::{
    create_client, ClientOptions, DataKind, FhevmError, SessionStatus, StaticChain,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

fn gateway() -> Arc<ScriptedGateway> {
    Arc::new(ScriptedGateway::answering(Ok(GatewayResponse::declined(
        "unused",
    ))))
}

#[tokio::test]
async fn test_concurrent_first_calls_load_once() {
    let loader = Arc::new(CountingLoader::slow(Duration::from_millis(50)));
    let client = Arc::new(client_with(loader.clone(), gateway(), ClientOptions::default()));

    let tasks = (0u64..8).map(|i| {
        let client = client.clone();
        async move { client.encrypt(&i.into(), DataKind::Uint8).await }
    });
    let results = join_all(tasks).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(loader.loads(), 1);
    assert_eq!(client.status(), SessionStatus::Ready);
}

#[tokio::test]
async fn test_concurrent_init_across_tasks() {
    let loader = Arc::new(CountingLoader::slow(Duration::from_millis(50)));
    let client = Arc::new(client_with(loader.clone(), gateway(), ClientOptions::default()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.init().await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(loader.loads(), 1);
}

#[tokio::test]
async fn test_concurrent_first_calls_share_failed_load() {
    let loader = Arc::new(CountingLoader::slow_failing(usize::MAX, Duration::from_millis(50)));
    let client = Arc::new(client_with(loader.clone(), gateway(), ClientOptions::default()));

    let tasks = (0u64..4).map(|i| {
        let client = client.clone();
        async move { client.encrypt(&i.into(), DataKind::Uint8).await }
    });
    let results = join_all(tasks).await;

    assert_eq!(loader.loads(), 1);
    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(err, FhevmError::Initialization(_)));
        assert!(err.to_string().contains("engine unavailable"));
    }
    assert_eq!(client.status(), SessionStatus::Failed);

    // a separate call starts a fresh attempt
    assert!(client.init().await.is_err());
    assert_eq!(loader.loads(), 2);
}

#[tokio::test]
async fn test_reset_during_init_discards_load() {
    let loader = Arc::new(CountingLoader::slow(Duration::from_millis(100)));
    let client = Arc::new(client_with(loader.clone(), gateway(), ClientOptions::default()));

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.init().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(client.status(), SessionStatus::Initializing);

    client.reset();
    pending.await.unwrap().unwrap();

    assert_eq!(client.status(), SessionStatus::Uninitialized);
    assert!(!client.is_ready());
    assert_eq!(loader.loads(), 1);

    client.init().await.unwrap();
    assert_eq!(client.status(), SessionStatus::Ready);
    assert_eq!(loader.loads(), 2);
}

#[tokio::test]
async fn test_init_is_noop_once_ready() {
    let loader = Arc::new(CountingLoader::new());
    let client = client_with(loader.clone(), gateway(), ClientOptions::default());

    client.init().await.unwrap();
    client.init().await.unwrap();
    client.encrypt(&1u64.into(), DataKind::Uint8).await.unwrap();

    assert_eq!(loader.loads(), 1);
}

#[tokio::test]
async fn test_failed_init_can_be_retried() {
    let loader = Arc::new(CountingLoader::failing(1));
    let client = client_with(loader.clone(), gateway(), ClientOptions::default());

    let err = client.init().await.unwrap_err();
    assert!(matches!(err, FhevmError::Initialization(_)));
    assert!(err.to_string().contains("engine unavailable"));
    assert_eq!(client.status(), SessionStatus::Failed);

    client.init().await.unwrap();
    assert_eq!(client.status(), SessionStatus::Ready);
    assert_eq!(loader.loads(), 2);
}

#[tokio::test]
async fn test_init_failure_surfaces_through_operations() {
    let loader = Arc::new(CountingLoader::failing(2));
    let client = client_with(loader, gateway(), ClientOptions::default());

    let err = client
        .encrypt(&1u64.into(), DataKind::Uint8)
        .await
        .unwrap_err();
    assert!(matches!(err, FhevmError::Initialization(_)));

    let err = client.public_decrypt("0x01").await.unwrap_err();
    assert!(matches!(err, FhevmError::Initialization(_)));
}

#[tokio::test]
async fn test_reset_forces_reload() {
    let loader = Arc::new(CountingLoader::new());
    let client = client_with(loader.clone(), gateway(), ClientOptions::default());

    client.encrypt(&3u64.into(), DataKind::Uint8).await.unwrap();
    client.reset();
    assert_eq!(client.status(), SessionStatus::Uninitialized);
    assert_eq!(client.cache_stats().entries, 0);

    client.encrypt(&3u64.into(), DataKind::Uint8).await.unwrap();
    assert_eq!(loader.loads(), 2);
}

#[tokio::test]
async fn test_create_client_initializes_eagerly() {
    let loader = Arc::new(CountingLoader::new());
    let client = create_client(
        loader.clone(),
        gateway(),
        Arc::new(StaticChain(1)),
        ClientOptions::default(),
    )
    .await
    .unwrap();

    assert!(client.is_ready());
    assert_eq!(loader.loads(), 1);
}

#[tokio::test]
async fn test_create_client_rejects_bad_options() {
    let loader = Arc::new(CountingLoader::new());
    let result = create_client(
        loader.clone(),
        gateway(),
        Arc::new(StaticChain(1)),
        ClientOptions::default().with_retry(0, 10),
    )
    .await;

    assert!(matches!(result, Err(FhevmError::Configuration(_))));
    assert_eq!(loader.loads(), 0);
}

#[tokio::test]
async fn test_create_client_propagates_load_failure() {
    let result = create_client(
        Arc::new(CountingLoader::failing(1)),
        gateway(),
        Arc::new(StaticChain(1)),
        ClientOptions::default(),
    )
    .await;

    assert!(matches!(result, Err(FhevmError::Initialization(_))));
}
