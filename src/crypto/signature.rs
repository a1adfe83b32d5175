// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDSA Signature Recovery
//!
//! Recovers the Ethereum address that produced a 65-byte `r || s || v`
//! signature over a 32-byte digest.

use anyhow::{anyhow, Result};
use ethers::types::Address;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use super::typed_data::keccak256;

/// Decode a `0x`-prefixed hex signature into raw bytes
pub fn decode_signature(signature: &str) -> Result<Vec<u8>> {
    let digits = signature.strip_prefix("0x").unwrap_or(signature);
    hex::decode(digits).map_err(|e| anyhow!("Invalid signature hex: {}", e))
}

/// Recover the signer address from a 65-byte signature and 32-byte digest
///
/// Accepts recovery ids in both raw (0/1) and Ethereum (27/28) form.
///
/// # Errors
///
/// Returns error if:
/// - Signature is not exactly 65 bytes
/// - Digest is not exactly 32 bytes
/// - Recovery ID is invalid
/// - Public key recovery fails
pub fn recover_signer(signature: &[u8], digest: &[u8]) -> Result<Address> {
    if signature.len() != 65 {
        return Err(anyhow!(
            "Invalid signature size: expected 65 bytes, got {}",
            signature.len()
        ));
    }
    if digest.len() != 32 {
        return Err(anyhow!(
            "Invalid message hash size: expected 32 bytes, got {}",
            digest.len()
        ));
    }

    let mut v = signature[64];
    if v >= 27 {
        v -= 27;
    }
    if v > 3 {
        return Err(anyhow!("Invalid recovery ID: expected 0-3, got {}", v));
    }

    let recovery_id =
        RecoveryId::try_from(v).map_err(|e| anyhow!("Failed to create recovery ID: {}", e))?;
    let signature = Signature::try_from(&signature[..64])
        .map_err(|e| anyhow!("Failed to parse signature: {}", e))?;
    let verifying_key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
        .map_err(|e| anyhow!("Failed to recover public key: {}", e))?;

    Ok(address_of(&verifying_key))
}

/// Ethereum address of a public key: last 20 bytes of keccak256(x || y)
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
