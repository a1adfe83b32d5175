// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! EIP-712 typed data for decryption permits
//!
//! ## Hash Formula
//!
//! ```text
//! domainSeparator = keccak256(
//!     keccak256("EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")
//!     || keccak256(name) || keccak256(version) || uint256(chainId) || pad32(verifyingContract))
//! structHash      = keccak256(keccak256("Decryption(bytes32 handle,address user)") || handle || pad32(user))
//! digest          = keccak256(0x19 || 0x01 || domainSeparator || structHash)
//! ```
//!
//! The domain separator and the final digest come from ethers' [`Eip712`]
//! implementation; only the permit struct is encoded here.
//!
//! The permit binds exactly one handle to one user. The contract address
//! only enters through `verifyingContract`, which keeps a signature from
//! being replayed against a different contract.

use ethers::types::transaction::eip712::{EIP712Domain, Eip712};
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

use crate::error::FhevmError;

/// Domain name shared by every decryption permit
pub const EIP712_DOMAIN_NAME: &str = "FhevmDecryption";

/// Domain version shared by every decryption permit
pub const EIP712_DOMAIN_VERSION: &str = "1";

/// EIP-712 domain for one decryption request
///
/// Rebuilt for every request; `chain_id` and `verifying_contract` vary per
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl From<&AuthorizationDomain> for EIP712Domain {
    fn from(domain: &AuthorizationDomain) -> Self {
        EIP712Domain {
            name: Some(domain.name.clone()),
            version: Some(domain.version.clone()),
            chain_id: Some(U256::from(domain.chain_id)),
            verifying_contract: Some(domain.verifying_contract),
            salt: None,
        }
    }
}

/// One member of a typed-data struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedField {
    pub name: &'static str,
    pub ty: &'static str,
}

/// Struct schema handed to signers alongside the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedSchema {
    pub primary_type: &'static str,
    pub fields: &'static [TypedField],
}

impl TypedSchema {
    /// Canonical `encodeType` string, e.g. `Decryption(bytes32 handle,address user)`
    pub fn encode_type(&self) -> String {
        let members: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{} {}", f.ty, f.name))
            .collect();
        format!("{}({})", self.primary_type, members.join(","))
    }

    pub fn type_hash(&self) -> [u8; 32] {
        keccak256(self.encode_type().as_bytes())
    }
}

/// `Decryption(bytes32 handle, address user)`
pub const DECRYPTION_SCHEMA: TypedSchema = TypedSchema {
    primary_type: "Decryption",
    fields: &[
        TypedField {
            name: "handle",
            ty: "bytes32",
        },
        TypedField {
            name: "user",
            ty: "address",
        },
    ],
};

/// The value signed to authorize decryption of one handle by one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionPermit {
    pub handle: H256,
    pub user: Address,
}

impl DecryptionPermit {
    pub fn new(handle: H256, user: Address) -> Self {
        Self { handle, user }
    }

    /// Build a permit from a `0x`-prefixed 32-byte handle
    pub fn from_handle(handle: &str, user: Address) -> Result<Self, FhevmError> {
        Ok(Self {
            handle: parse_bytes32(handle)?,
            user,
        })
    }
}

/// Parse a `0x`-prefixed hex string that must be exactly 32 bytes
pub fn parse_bytes32(value: &str) -> Result<H256, FhevmError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| FhevmError::Signature("handle must be 0x-prefixed".to_string()))?;
    let bytes = hex::decode(digits)
        .map_err(|e| FhevmError::Signature(format!("invalid handle hex: {}", e)))?;
    if bytes.len() != 32 {
        return Err(FhevmError::Signature(format!(
            "handle must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(H256::from_slice(&bytes))
}

/// Parse an address string into an ethers `Address`
pub fn parse_address(value: &str) -> Result<Address, FhevmError> {
    crate::codec::validate_address(value)?;
    Address::from_str(value).map_err(|e| FhevmError::Validation(
        crate::error::ValidationError::Format(format!("invalid address: {}", e)),
    ))
}

/// A permit bound to its domain, signable through ethers' `Eip712`
#[derive(Debug, Clone, Copy)]
pub struct SignablePermit<'a> {
    pub domain: &'a AuthorizationDomain,
    pub permit: &'a DecryptionPermit,
}

impl Eip712 for SignablePermit<'_> {
    type Error = Infallible;

    fn domain(&self) -> Result<EIP712Domain, Self::Error> {
        Ok(EIP712Domain::from(self.domain))
    }

    fn type_hash() -> Result<[u8; 32], Self::Error> {
        Ok(DECRYPTION_SCHEMA.type_hash())
    }

    fn struct_hash(&self) -> Result<[u8; 32], Self::Error> {
        Ok(struct_hash(self.permit))
    }
}

/// Hash the domain into its 32-byte separator
pub fn domain_separator(domain: &AuthorizationDomain) -> [u8; 32] {
    EIP712Domain::from(domain).separator()
}

/// `hashStruct` of a permit under [`DECRYPTION_SCHEMA`]
pub fn struct_hash(permit: &DecryptionPermit) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(32 * 3);
    encoded.extend_from_slice(&DECRYPTION_SCHEMA.type_hash());
    encoded.extend_from_slice(permit.handle.as_bytes());
    encoded.extend_from_slice(&encode_address(permit.user));
    keccak256(&encoded)
}

/// Final EIP-712 digest that gets signed
pub fn typed_data_hash(domain: &AuthorizationDomain, permit: &DecryptionPermit) -> H256 {
    match (SignablePermit { domain, permit }).encode_eip712() {
        Ok(digest) => H256::from(digest),
        Err(never) => match never {},
    }
}

/// JSON payload in `eth_signTypedData_v4` shape
///
/// Lets wallet-backed signers forward the request unchanged.
pub fn to_typed_data_json(domain: &AuthorizationDomain, permit: &DecryptionPermit) -> serde_json::Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" }
            ],
            "Decryption": DECRYPTION_SCHEMA
                .fields
                .iter()
                .map(|f| json!({ "name": f.name, "type": f.ty }))
                .collect::<Vec<_>>()
        },
        "primaryType": DECRYPTION_SCHEMA.primary_type,
        "domain": {
            "name": domain.name,
            "version": domain.version,
            "chainId": domain.chain_id,
            "verifyingContract": format!("{:?}", domain.verifying_contract)
        },
        "message": {
            "handle": format!("{:?}", permit.handle),
            "user": format!("{:?}", permit.user)
        }
    })
}

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut hash = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut hash);
    hash
}

fn encode_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}
