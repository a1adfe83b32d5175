// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signer and chain capabilities
//!
//! The session client only depends on these two traits, never on a
//! concrete wallet or provider type:
//!
//! - [`Signer`]: `get_address()` + `sign_typed_data(domain, schema, value)`
//! - [`ChainReader`]: `get_chain_id()`
//!
//! Implementations are provided for `ethers::signers::LocalWallet`,
//! `ethers::providers::Provider<Http>` and a fixed chain id.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer as EthersSigner};
use ethers::types::Address;

use super::typed_data::{
    typed_data_hash, AuthorizationDomain, DecryptionPermit, TypedSchema, DECRYPTION_SCHEMA,
};

/// A user-controlled signing key
#[async_trait]
pub trait Signer: Send + Sync {
    /// Address of the signing key
    async fn get_address(&self) -> Result<Address>;

    /// Produce a `0x`-prefixed 65-byte EIP-712 signature over `value`
    async fn sign_typed_data(
        &self,
        domain: &AuthorizationDomain,
        schema: &TypedSchema,
        value: &DecryptionPermit,
    ) -> Result<String>;
}

/// Source of the current chain id
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_chain_id(&self) -> Result<u64>;
}

#[async_trait]
impl Signer for LocalWallet {
    async fn get_address(&self) -> Result<Address> {
        Ok(EthersSigner::address(self))
    }

    async fn sign_typed_data(
        &self,
        domain: &AuthorizationDomain,
        schema: &TypedSchema,
        value: &DecryptionPermit,
    ) -> Result<String> {
        if schema.encode_type() != DECRYPTION_SCHEMA.encode_type() {
            return Err(anyhow!(
                "Unsupported typed-data schema: {}",
                schema.encode_type()
            ));
        }
        let digest = typed_data_hash(domain, value);
        let signature = self
            .sign_hash(digest)
            .map_err(|e| anyhow!("Wallet signing failed: {}", e))?;
        Ok(format!("0x{}", hex::encode(signature.to_vec())))
    }
}

/// A chain id known up front (tests, offline tools)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticChain(pub u64);

#[async_trait]
impl ChainReader for StaticChain {
    async fn get_chain_id(&self) -> Result<u64> {
        Ok(self.0)
    }
}

#[async_trait]
impl ChainReader for Provider<Http> {
    async fn get_chain_id(&self) -> Result<u64> {
        let chain_id = self
            .get_chainid()
            .await
            .map_err(|e| anyhow!("Failed to fetch chain id: {}", e))?;
        Ok(chain_id.as_u64())
    }
}
