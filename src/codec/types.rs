// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Data kinds and plaintext values accepted by the encryptor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// The closed set of primitive types the engine knows how to encrypt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Address,
    Bool,
}

impl DataKind {
    /// Every supported kind, in declaration order
    pub const ALL: [DataKind; 6] = [
        DataKind::Uint8,
        DataKind::Uint16,
        DataKind::Uint32,
        DataKind::Uint64,
        DataKind::Address,
        DataKind::Bool,
    ];

    /// Bit width of unsigned kinds; 0 for address and bool
    pub fn bits(&self) -> u32 {
        match self {
            DataKind::Uint8 => 8,
            DataKind::Uint16 => 16,
            DataKind::Uint32 => 32,
            DataKind::Uint64 => 64,
            DataKind::Address | DataKind::Bool => 0,
        }
    }

    pub fn is_unsigned(&self) -> bool {
        self.bits() > 0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Uint8 => "uint8",
            DataKind::Uint16 => "uint16",
            DataKind::Uint32 => "uint32",
            DataKind::Uint64 => "uint64",
            DataKind::Address => "address",
            DataKind::Bool => "bool",
        }
    }

    /// Single-byte tag used by engines that need to self-describe ciphertexts
    pub fn tag(&self) -> u8 {
        match self {
            DataKind::Uint8 => 1,
            DataKind::Uint16 => 2,
            DataKind::Uint32 => 3,
            DataKind::Uint64 => 4,
            DataKind::Address => 5,
            DataKind::Bool => 6,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        DataKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::Format(format!("unknown type: {}", s)))
    }
}

/// A plaintext value as received from a caller, before validation
///
/// Deserializes untagged from a JSON boolean, number or string, mirroring
/// what UI and API layers hand in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaintextValue {
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for PlaintextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaintextValue::Bool(b) => write!(f, "{}", b),
            PlaintextValue::Unsigned(n) => write!(f, "{}", n),
            PlaintextValue::Signed(n) => write!(f, "{}", n),
            PlaintextValue::Float(x) => write!(f, "{}", x),
            PlaintextValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PlaintextValue {
    fn from(value: bool) -> Self {
        PlaintextValue::Bool(value)
    }
}

impl From<u8> for PlaintextValue {
    fn from(value: u8) -> Self {
        PlaintextValue::Unsigned(value as u64)
    }
}

impl From<u16> for PlaintextValue {
    fn from(value: u16) -> Self {
        PlaintextValue::Unsigned(value as u64)
    }
}

impl From<u32> for PlaintextValue {
    fn from(value: u32) -> Self {
        PlaintextValue::Unsigned(value as u64)
    }
}

impl From<u64> for PlaintextValue {
    fn from(value: u64) -> Self {
        PlaintextValue::Unsigned(value)
    }
}

impl From<i32> for PlaintextValue {
    fn from(value: i32) -> Self {
        PlaintextValue::Signed(value as i64)
    }
}

impl From<i64> for PlaintextValue {
    fn from(value: i64) -> Self {
        PlaintextValue::Signed(value)
    }
}

impl From<f64> for PlaintextValue {
    fn from(value: f64) -> Self {
        PlaintextValue::Float(value)
    }
}

impl From<&str> for PlaintextValue {
    fn from(value: &str) -> Self {
        PlaintextValue::Text(value.to_string())
    }
}

impl From<String> for PlaintextValue {
    fn from(value: String) -> Self {
        PlaintextValue::Text(value)
    }
}
