// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local development engine
//!
//! Seals type-tagged plaintexts with XChaCha20-Poly1305 under a single
//! 32-byte key. Handles are self-describing and can be opened again by the
//! same engine, which makes the whole encrypt → public decrypt loop
//! runnable without a remote FHE library.
//!
//! ## Handle Layout
//!
//! ```text
//! nonce (24) || AEAD( kind_tag (1) || payload ) || tag (16)
//! ```
//!
//! The nonce is `keccak256(key || plaintext)[..24]`, so identical
//! plaintexts produce identical handles (encryption is deterministic).
//! This engine provides no homomorphic properties.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use std::sync::Arc;
use tiny_keccak::{Hasher, Keccak};
use tracing::debug;

use super::{CryptoEngine, DecryptedValue, EngineLoader};
use crate::codec::DataKind;

const NONCE_SIZE: usize = 24;
const TAG_SIZE: usize = 16;
const HANDLE_AAD: &[u8] = b"fhevm-session/local-engine/v1";
const HKDF_INFO: &[u8] = b"fhevm-session local engine key";

/// Deterministic AEAD-backed engine
pub struct LocalEngine {
    key: [u8; 32],
}

impl LocalEngine {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Derive the engine key from arbitrary seed material with HKDF-SHA256
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if seed.is_empty() {
            return Err(anyhow!("Engine seed cannot be empty"));
        }
        let hkdf = Hkdf::<Sha256>::new(None, seed);
        let mut key = [0u8; 32];
        hkdf.expand(HKDF_INFO, &mut key)
            .map_err(|e| anyhow!("HKDF expansion failed: {}", e))?;
        Ok(Self { key })
    }

    /// Engine with a fresh random key
    pub fn random() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    fn seal(&self, kind: DataKind, payload: &[u8]) -> Result<Vec<u8>> {
        let mut plaintext = Vec::with_capacity(1 + payload.len());
        plaintext.push(kind.tag());
        plaintext.extend_from_slice(payload);

        let nonce = self.derive_nonce(&plaintext);
        let cipher = XChaCha20Poly1305::new_from_slice(&self.key)
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;
        let sealed = cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: &plaintext,
                    aad: HANDLE_AAD,
                },
            )
            .map_err(|e| anyhow!("Encryption failed: {}", e))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        debug!("Sealed {} handle ({} bytes)", kind, out.len());
        Ok(out)
    }

    fn open(&self, bytes: &[u8]) -> Result<(DataKind, Vec<u8>)> {
        if bytes.len() < NONCE_SIZE + 1 + TAG_SIZE {
            return Err(anyhow!(
                "Handle too short: expected at least {} bytes, got {}",
                NONCE_SIZE + 1 + TAG_SIZE,
                bytes.len()
            ));
        }
        let (nonce, sealed) = bytes.split_at(NONCE_SIZE);
        let cipher = XChaCha20Poly1305::new_from_slice(&self.key)
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;
        let plaintext = cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: HANDLE_AAD,
                },
            )
            .map_err(|e| anyhow!("Decryption failed (authentication error): {}", e))?;

        let kind = DataKind::from_tag(plaintext[0])
            .ok_or_else(|| anyhow!("Unknown type tag: {}", plaintext[0]))?;
        Ok((kind, plaintext[1..].to_vec()))
    }

    fn derive_nonce(&self, plaintext: &[u8]) -> [u8; NONCE_SIZE] {
        let mut hasher = Keccak::v256();
        let mut hash = [0u8; 32];
        hasher.update(&self.key);
        hasher.update(plaintext);
        hasher.finalize(&mut hash);

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&hash[..NONCE_SIZE]);
        nonce
    }
}

#[async_trait]
impl CryptoEngine for LocalEngine {
    fn name(&self) -> &'static str {
        "local"
    }

    fn encrypt_uint(&self, bits: u32, value: u64) -> Result<Vec<u8>> {
        let (kind, payload) = match bits {
            8 => (DataKind::Uint8, u8::try_from(value).map(|v| v.to_be_bytes().to_vec())),
            16 => (DataKind::Uint16, u16::try_from(value).map(|v| v.to_be_bytes().to_vec())),
            32 => (DataKind::Uint32, u32::try_from(value).map(|v| v.to_be_bytes().to_vec())),
            64 => (DataKind::Uint64, Ok(value.to_be_bytes().to_vec())),
            other => return Err(anyhow!("Unsupported bit width: {}", other)),
        };
        let payload = payload.map_err(|_| anyhow!("Value {} does not fit in {} bits", value, bits))?;
        self.seal(kind, &payload)
    }

    fn encrypt_address(&self, address: &str) -> Result<Vec<u8>> {
        let digits = address
            .strip_prefix("0x")
            .ok_or_else(|| anyhow!("Address must be 0x-prefixed"))?;
        let bytes = hex::decode(digits)?;
        if bytes.len() != 20 {
            return Err(anyhow!(
                "Invalid address size: expected 20 bytes, got {}",
                bytes.len()
            ));
        }
        self.seal(DataKind::Address, &bytes)
    }

    fn encrypt_bool(&self, value: bool) -> Result<Vec<u8>> {
        self.seal(DataKind::Bool, &[value as u8])
    }

    async fn decrypt(&self, handle: &str) -> Result<DecryptedValue> {
        let digits = handle
            .strip_prefix("0x")
            .ok_or_else(|| anyhow!("Handle must be 0x-prefixed"))?;
        let bytes = hex::decode(digits).map_err(|e| anyhow!("Invalid handle hex: {}", e))?;
        let (kind, payload) = self.open(&bytes)?;

        let value = match kind {
            DataKind::Uint8 | DataKind::Uint16 | DataKind::Uint32 | DataKind::Uint64 => {
                let width = (kind.bits() / 8) as usize;
                if payload.len() != width {
                    return Err(anyhow!("Corrupt {} payload", kind));
                }
                let mut buf = [0u8; 8];
                buf[8 - width..].copy_from_slice(&payload);
                DecryptedValue::Uint(u64::from_be_bytes(buf))
            }
            DataKind::Address => {
                if payload.len() != 20 {
                    return Err(anyhow!("Corrupt address payload"));
                }
                DecryptedValue::Address(format!("0x{}", hex::encode(&payload)))
            }
            DataKind::Bool => match payload.as_slice() {
                [0] => DecryptedValue::Bool(false),
                [1] => DecryptedValue::Bool(true),
                _ => return Err(anyhow!("Corrupt bool payload")),
            },
        };
        Ok(value)
    }
}

/// Loader handing out a [`LocalEngine`] built from a fixed key
#[derive(Clone)]
pub struct LocalEngineLoader {
    key: [u8; 32],
}

impl LocalEngineLoader {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let engine = LocalEngine::from_seed(seed)?;
        Ok(Self { key: engine.key })
    }

    pub fn random() -> Self {
        Self {
            key: LocalEngine::random().key,
        }
    }
}

#[async_trait]
impl EngineLoader for LocalEngineLoader {
    async fn load(&self) -> Result<Arc<dyn CryptoEngine>> {
        Ok(Arc::new(LocalEngine::new(self.key)))
    }
}
