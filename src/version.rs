// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for fhevm-session

/// Full version string with feature description
pub const VERSION: &str = "v0.3.0-user-decryption-2026-10-12";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.3.0";

pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 3;
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2026-10-12";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "lazy-engine-init",
    "typed-encryption",
    "encryption-cache",
    "public-decryption",
    "user-decryption",
    "eip712-authorization",
    "batch-decryption",
    "gateway-retry",
    "key-service",
    "compute-submission",
];

/// Chain IDs with a built-in network profile
pub const SUPPORTED_CHAINS: &[u64] = &[
    11155111, // Sepolia
    31337,    // Localhost
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("fhevm-session {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
        "chains": SUPPORTED_CHAINS,
    })
}
