// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authorization signatures for user decryption
//!
//! - **Typed data**: EIP-712 domain, `Decryption(bytes32 handle,address user)`
//!   schema and digest computation
//! - **Signer capabilities**: `Signer` / `ChainReader` traits
//! - **Signing**: build domain, sign, verify
//! - **Recovery**: ECDSA public key recovery to an Ethereum address
//!
//! ## Protocol Flow
//!
//! 1. Client reads the chain id and builds a domain for the target contract
//! 2. Client asks the signer to sign `Decryption(handle, user)` under it
//! 3. Client recomputes the digest for audit and forwards the signature
//! 4. The gateway (or [`verify`]) recovers the signer and compares addresses

pub mod signature;
pub mod signer;
pub mod signing;
pub mod typed_data;

pub use signature::{address_of, decode_signature, recover_signer};
pub use signer::{ChainReader, Signer, StaticChain};
pub use signing::{build_domain, sign, verify, SignatureResult};
pub use typed_data::{
    domain_separator, parse_address, parse_bytes32, struct_hash, to_typed_data_json,
    typed_data_hash, AuthorizationDomain, DecryptionPermit, SignablePermit, TypedField,
    TypedSchema, DECRYPTION_SCHEMA, EIP712_DOMAIN_NAME, EIP712_DOMAIN_VERSION,
};
