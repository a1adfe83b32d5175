// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod client;
pub mod types;

pub use client::{create_client, SessionClient};
pub use types::{
    DecryptionMode, DecryptionRequest, DecryptionResult, EncryptionRecord, SessionStatus,
};
