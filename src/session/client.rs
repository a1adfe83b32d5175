// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session client
//!
//! Owns one crypto engine (loaded lazily, once), the encryption cache, the
//! signer and chain context, and the gateway transport.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized -> Initializing -> Ready
//!                       |
//!                       v
//!                    Failed  (next init() retries)
//! ```
//!
//! Every operation that needs the engine goes through `ensure_ready`, so
//! callers never have to call [`SessionClient::init`] themselves. Concurrent
//! first callers share one in-flight load.

use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use ethers::types::Address;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::types::{
    DecryptionMode, DecryptionRequest, DecryptionResult, EncryptionRecord, SessionStatus,
};
use crate::cache::{CacheStats, EncryptionCache};
use crate::codec::{self, DataKind, PlaintextValue};
use crate::config::ClientOptions;
use crate::crypto::signer::{ChainReader, Signer};
use crate::crypto::signing::{build_domain, sign};
use crate::crypto::typed_data::parse_address;
use crate::engine::{CryptoEngine, DecryptedValue, EngineLoader};
use crate::error::FhevmError;
use crate::gateway::{
    GatewayError, GatewayResponse, GatewayTransport, PublicDecryptionRequest,
    UserDecryptionRequest,
};

type LoadAttempt = Shared<BoxFuture<'static, Result<Arc<dyn CryptoEngine>, FhevmError>>>;

enum EngineSlot {
    Idle { failed: bool },
    Loading(LoadAttempt),
    Ready(Arc<dyn CryptoEngine>),
}

/// Engine slot plus the number of the attempt that owns it
///
/// Every new load and every reset bumps `attempt`; a load only settles the
/// slot if its number is still current.
struct EngineState {
    attempt: u64,
    slot: EngineSlot,
}

/// Plaintext after validation, ready for the engine
enum Prepared {
    Uint { bits: u32, value: u64 },
    Address(String),
    Bool(bool),
}

fn prepare(value: &PlaintextValue, kind: DataKind) -> Result<Prepared, FhevmError> {
    let invalid = |e: crate::error::ValidationError| FhevmError::Encryption(e.to_string());

    codec::validate(value, kind).map_err(invalid)?;
    Ok(match kind {
        DataKind::Bool => Prepared::Bool(codec::coerce_bool(value).map_err(invalid)?),
        DataKind::Address => Prepared::Address(value.to_string()),
        _ => Prepared::Uint {
            bits: kind.bits(),
            value: codec::coerce_uint(value, kind.bits()).map_err(invalid)?,
        },
    })
}

pub struct SessionClient {
    loader: Arc<dyn EngineLoader>,
    gateway: Arc<dyn GatewayTransport>,
    engine: Mutex<EngineState>,
    signer: RwLock<Option<Arc<dyn Signer>>>,
    chain: RwLock<Arc<dyn ChainReader>>,
    cache: EncryptionCache,
    options: ClientOptions,
}

impl SessionClient {
    pub fn new(
        loader: Arc<dyn EngineLoader>,
        gateway: Arc<dyn GatewayTransport>,
        chain: Arc<dyn ChainReader>,
        options: ClientOptions,
    ) -> Self {
        Self {
            loader,
            gateway,
            engine: Mutex::new(EngineState {
                attempt: 0,
                slot: EngineSlot::Idle { failed: false },
            }),
            signer: RwLock::new(None),
            chain: RwLock::new(chain),
            cache: EncryptionCache::new(),
            options,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = RwLock::new(Some(signer));
        self
    }

    // ---- lifecycle ----

    /// Load the engine if it is not loaded yet
    pub async fn init(&self) -> Result<(), FhevmError> {
        if self.is_ready() {
            self.note("init: engine already loaded");
            return Ok(());
        }
        self.ensure_ready().await.map(|_| ())
    }

    pub fn status(&self) -> SessionStatus {
        match self.engine.lock() {
            Ok(state) => match state.slot {
                EngineSlot::Idle { failed: false } => SessionStatus::Uninitialized,
                EngineSlot::Idle { failed: true } => SessionStatus::Failed,
                EngineSlot::Loading(_) => SessionStatus::Initializing,
                EngineSlot::Ready(_) => SessionStatus::Ready,
            },
            Err(_) => SessionStatus::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == SessionStatus::Ready
    }

    /// Drop the engine and the cache; the next operation loads again
    ///
    /// A load still in flight finishes for its own callers but is not kept.
    pub fn reset(&self) {
        if let Ok(mut state) = self.engine.lock() {
            state.attempt += 1;
            state.slot = EngineSlot::Idle { failed: false };
        }
        self.cache.clear();
        info!("Session client reset");
    }

    async fn ensure_ready(&self) -> Result<Arc<dyn CryptoEngine>, FhevmError> {
        let (attempt, load) = {
            let mut state = self.lock_engine()?;
            let in_flight = match &state.slot {
                EngineSlot::Ready(engine) => return Ok(engine.clone()),
                EngineSlot::Loading(load) => Some(load.clone()),
                EngineSlot::Idle { .. } => None,
            };
            match in_flight {
                Some(load) => (state.attempt, load),
                None => {
                    state.attempt += 1;
                    let load = self.start_load();
                    state.slot = EngineSlot::Loading(load.clone());
                    (state.attempt, load)
                }
            }
        };

        let outcome = load.await;
        self.settle(attempt, &outcome);
        outcome
    }

    fn start_load(&self) -> LoadAttempt {
        let loader = self.loader.clone();
        async move {
            info!("Loading crypto engine");
            match loader.load().await {
                Ok(engine) => {
                    info!("Crypto engine '{}' loaded", engine.name());
                    Ok(engine)
                }
                Err(e) => {
                    error!("Failed to load crypto engine: {}", e);
                    Err(FhevmError::Initialization(e.to_string()))
                }
            }
        }
        .boxed()
        .shared()
    }

    fn settle(&self, attempt: u64, outcome: &Result<Arc<dyn CryptoEngine>, FhevmError>) {
        let Ok(mut state) = self.engine.lock() else {
            return;
        };
        if state.attempt != attempt || !matches!(state.slot, EngineSlot::Loading(_)) {
            return;
        }
        state.slot = match outcome {
            Ok(engine) => EngineSlot::Ready(engine.clone()),
            Err(_) => EngineSlot::Idle { failed: true },
        };
    }

    fn lock_engine(&self) -> Result<std::sync::MutexGuard<'_, EngineState>, FhevmError> {
        self.engine
            .lock()
            .map_err(|_| FhevmError::Initialization("engine state poisoned".to_string()))
    }

    // ---- context ----

    pub async fn set_signer(&self, signer: Arc<dyn Signer>) {
        *self.signer.write().await = Some(signer);
        debug!("Signer configured");
    }

    pub async fn clear_signer(&self) {
        *self.signer.write().await = None;
    }

    pub async fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.signer.read().await.clone()
    }

    pub async fn set_chain_reader(&self, chain: Arc<dyn ChainReader>) {
        *self.chain.write().await = chain;
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    // ---- encryption ----

    /// Encrypt `value` as `kind`
    ///
    /// Validation runs first and never reaches the engine. With the cache
    /// enabled, a repeated `(kind, value)` returns the earlier record.
    pub async fn encrypt(
        &self,
        value: &PlaintextValue,
        kind: DataKind,
    ) -> Result<EncryptionRecord, FhevmError> {
        let prepared = prepare(value, kind)?;

        if self.options.enable_cache {
            if let Some(record) = self.cache.get(kind, value) {
                self.note(&format!("cache hit for {} {}", kind, value));
                return Ok(record);
            }
        }

        let engine = self.ensure_ready().await?;
        let bytes = match prepared {
            Prepared::Uint { bits, value } => engine.encrypt_uint(bits, value),
            Prepared::Address(address) => engine.encrypt_address(&address),
            Prepared::Bool(b) => engine.encrypt_bool(b),
        }
        .map_err(|e| FhevmError::Encryption(e.to_string()))?;

        let record = EncryptionRecord {
            data: format!("0x{}", hex::encode(bytes)),
            original_value: value.to_string(),
            data_kind: kind,
            timestamp: Utc::now(),
        };

        if self.options.enable_cache {
            self.cache.insert(record.clone());
        }
        debug!("Encrypted {} value ({} chars)", kind, record.data.len());
        Ok(record)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        self.note("encryption cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // ---- decryption ----

    /// Decrypt a publicly decryptable handle
    ///
    /// The engine is asked first; handles it cannot open (results computed
    /// elsewhere) go to the gateway's public route. Only initialization
    /// failures are returned as `Err`.
    pub async fn public_decrypt(&self, handle: &str) -> Result<DecryptionResult, FhevmError> {
        let engine = self.ensure_ready().await?;

        if let Err(e) = codec::validate_handle(handle) {
            return Ok(DecryptionResult::failed(e));
        }

        let engine_error = match engine.decrypt(handle).await {
            Ok(value) => return Ok(DecryptionResult::Decrypted { value }),
            Err(e) => e,
        };
        self.note(&format!("engine could not open {}: {}", handle, engine_error));

        let request = PublicDecryptionRequest {
            handle: handle.to_string(),
        };
        Ok(
            match self
                .call_gateway(|| self.gateway.public_decrypt(&request))
                .await
            {
                Ok(value) => DecryptionResult::Decrypted { value },
                Err(e) => DecryptionResult::failed(format!("{}; {}", engine_error, e)),
            },
        )
    }

    /// Decrypt a handle on behalf of the configured signer
    ///
    /// Returns `Err(Authorization)` when no signer is set and
    /// `Err(Initialization)` when the engine cannot load. Every later failure
    /// is reported in-band.
    pub async fn user_decrypt(
        &self,
        contract_address: &str,
        handle: &str,
    ) -> Result<DecryptionResult, FhevmError> {
        let signer = self.signer().await.ok_or_else(|| {
            FhevmError::Authorization(
                "signer not configured, call set_signer() first".to_string(),
            )
        })?;
        self.ensure_ready().await?;

        Ok(
            match self
                .authorize_and_decrypt(signer.as_ref(), contract_address, handle)
                .await
            {
                Ok(value) => DecryptionResult::Decrypted { value },
                Err(e) => {
                    warn!("User decryption of {} failed: {}", handle, e);
                    DecryptionResult::failed(e)
                }
            },
        )
    }

    async fn authorize_and_decrypt(
        &self,
        signer: &dyn Signer,
        contract_address: &str,
        handle: &str,
    ) -> Result<DecryptedValue, FhevmError> {
        let contract = parse_address(contract_address)?;
        let chain = self.chain.read().await.clone();
        let chain_id = chain
            .get_chain_id()
            .await
            .map_err(|e| FhevmError::Decryption(format!("failed to read chain id: {}", e)))?;
        let user: Address = signer
            .get_address()
            .await
            .map_err(|e| FhevmError::Signature(e.to_string()))?;

        let domain = build_domain(chain_id, contract);
        let signed = sign(signer, &domain, handle, user).await?;

        let request = UserDecryptionRequest {
            contract_address: format!("{:?}", contract),
            handle: handle.to_string(),
            signature: signed.signature,
            user_address: format!("{:?}", user),
        };
        self.call_gateway(|| self.gateway.user_decrypt(&request))
            .await
            .map_err(|e| FhevmError::Decryption(e.to_string()))
    }

    /// Decrypt each request in order; one slot's failure never aborts the rest
    pub async fn batch_decrypt(&self, requests: &[DecryptionRequest]) -> Vec<DecryptionResult> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            let outcome = match &request.mode {
                DecryptionMode::Public => self.public_decrypt(&request.handle).await,
                DecryptionMode::User { contract_address } => {
                    self.user_decrypt(contract_address, &request.handle).await
                }
            };
            results.push(outcome.unwrap_or_else(DecryptionResult::failed));
        }
        debug!(
            "Batch decryption: {}/{} succeeded",
            results.iter().filter(|r| r.is_success()).count(),
            results.len()
        );
        results
    }

    /// Call the gateway, retrying transport failures
    async fn call_gateway<F, Fut>(&self, mut call: F) -> Result<DecryptedValue, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<GatewayResponse, GatewayError>>,
    {
        let attempts = self.options.retry_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(response) => return response.into_value(),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        "Gateway attempt {}/{} failed: {}; retrying",
                        attempt, attempts, e
                    );
                    tokio::time::sleep(self.options.retry_delay()).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Log a client decision; promoted to `info` when debug is on
    fn note(&self, message: &str) {
        if self.options.debug {
            info!("[fhevm] {}", message);
        } else {
            debug!("{}", message);
        }
    }
}

/// Build a client and load its engine before returning it
pub async fn create_client(
    loader: Arc<dyn EngineLoader>,
    gateway: Arc<dyn GatewayTransport>,
    chain: Arc<dyn ChainReader>,
    options: ClientOptions,
) -> Result<SessionClient, FhevmError> {
    options.validate()?;
    let client = SessionClient::new(loader, gateway, chain, options);
    client.init().await?;
    Ok(client)
}
