// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cache;
pub mod codec;
pub mod compute;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod keys;
pub mod session;
pub mod version;

// Re-export the client surface
pub use cache::{CacheStats, EncryptionCache};
pub use codec::{validate, DataKind, PlaintextValue};
pub use config::{ClientOptions, NetworkInfo, ServerConfig};
pub use crypto::{
    build_domain, sign, typed_data_hash, verify, AuthorizationDomain, ChainReader,
    DecryptionPermit, SignatureResult, Signer, StaticChain,
};
pub use engine::{CryptoEngine, DecryptedValue, EngineLoader, LocalEngine, LocalEngineLoader};
pub use error::{FhevmError, ValidationError};
pub use gateway::{
    GatewayError, GatewayResponse, GatewayTransport, HttpGateway, UnavailableGateway,
};
pub use keys::{KeyServiceClient, PublicKeyInfo};
pub use session::{
    create_client, DecryptionMode, DecryptionRequest, DecryptionResult, EncryptionRecord,
    SessionClient, SessionStatus,
};
