// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod networks;
pub mod options;
pub mod server;

pub use networks::{
    network_by_chain_id, network_by_name, supported_networks, validate_rpc_url, NetworkInfo,
};
pub use options::{ClientOptions, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
pub use server::{validate_private_key, ServerConfig};
