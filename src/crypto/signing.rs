// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decryption authorization signatures
//!
//! Builds the EIP-712 domain for a request, asks a [`Signer`] for a
//! signature over `Decryption(handle, user)`, and verifies such signatures
//! by recovering the signer.
//!
//! ## Usage
//!
//! ```ignore
//! let domain = build_domain(chain_id, contract);
//! let result = sign(&wallet, &domain, handle, user).await?;
//! assert!(verify(&result.signature, &domain, handle, user, &format!("{:?}", user)));
//! ```

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::signature::{decode_signature, recover_signer};
use super::signer::Signer;
use super::typed_data::{
    typed_data_hash, AuthorizationDomain, DecryptionPermit, DECRYPTION_SCHEMA,
    EIP712_DOMAIN_NAME, EIP712_DOMAIN_VERSION,
};
use crate::error::FhevmError;

/// Output of a successful signing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResult {
    /// `0x`-prefixed 65-byte signature
    pub signature: String,
    /// Address reported by the signer
    pub signer: Address,
    /// EIP-712 digest, computed independently of the signer
    pub message_hash: H256,
}

/// Domain for one request, with the fixed name and version
pub fn build_domain(chain_id: u64, verifying_contract: Address) -> AuthorizationDomain {
    AuthorizationDomain {
        name: EIP712_DOMAIN_NAME.to_string(),
        version: EIP712_DOMAIN_VERSION.to_string(),
        chain_id,
        verifying_contract,
    }
}

/// Request a signature binding `handle` to `user_address`
///
/// `handle` must be a `0x`-prefixed 32-byte value. Any failure, including
/// the signer refusing, is reported as [`FhevmError::Signature`].
pub async fn sign(
    signer: &dyn Signer,
    domain: &AuthorizationDomain,
    handle: &str,
    user_address: Address,
) -> Result<SignatureResult, FhevmError> {
    let permit = DecryptionPermit::from_handle(handle, user_address)?;

    let signature = signer
        .sign_typed_data(domain, &DECRYPTION_SCHEMA, &permit)
        .await
        .map_err(|e| FhevmError::Signature(e.to_string()))?;
    let signer_address = signer
        .get_address()
        .await
        .map_err(|e| FhevmError::Signature(e.to_string()))?;
    let message_hash = typed_data_hash(domain, &permit);

    debug!(
        "Signed decryption permit for {:?} on chain {} (digest {:?})",
        user_address, domain.chain_id, message_hash
    );

    Ok(SignatureResult {
        signature,
        signer: signer_address,
        message_hash,
    })
}

/// Check that `signature` was produced by `expected_signer`
///
/// Pure predicate: malformed input or failed recovery yields `false`.
/// Addresses are compared case-insensitively.
pub fn verify(
    signature: &str,
    domain: &AuthorizationDomain,
    handle: &str,
    user_address: Address,
    expected_signer: &str,
) -> bool {
    let permit = match DecryptionPermit::from_handle(handle, user_address) {
        Ok(p) => p,
        Err(_) => return false,
    };
    let bytes = match decode_signature(signature) {
        Ok(b) => b,
        Err(_) => return false,
    };
    let digest = typed_data_hash(domain, &permit);

    match recover_signer(&bytes, digest.as_bytes()) {
        Ok(recovered) => {
            format!("{:?}", recovered).eq_ignore_ascii_case(expected_signer.trim())
        }
        Err(_) => false,
    }
}
