// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Input validation for plaintext values
//!
//! Validation always runs before the engine is touched. Failures are
//! classified as [`ValidationError::Range`] (well-formed but out of bounds)
//! or [`ValidationError::Format`] (wrong shape).

use super::types::{DataKind, PlaintextValue};
use crate::error::ValidationError;

/// Length of a `0x`-prefixed 20-byte address
pub const ADDRESS_LENGTH: usize = 42;

/// Validate `value` against the rules of `kind`
pub fn validate(value: &PlaintextValue, kind: DataKind) -> Result<(), ValidationError> {
    match kind {
        DataKind::Uint8 | DataKind::Uint16 | DataKind::Uint32 | DataKind::Uint64 => {
            coerce_uint(value, kind.bits()).map(|_| ())
        }
        DataKind::Address => match value {
            PlaintextValue::Text(s) => validate_address(s),
            _ => Err(ValidationError::Format("Address must be a string".to_string())),
        },
        DataKind::Bool => coerce_bool(value).map(|_| ()),
    }
}

/// Coerce a value into an unsigned integer of `bits` width
///
/// uint64 is checked against the full `u64` range.
pub fn coerce_uint(value: &PlaintextValue, bits: u32) -> Result<u64, ValidationError> {
    let n = match value {
        PlaintextValue::Unsigned(n) => *n,
        PlaintextValue::Signed(n) => {
            if *n < 0 {
                return Err(non_negative());
            }
            *n as u64
        }
        PlaintextValue::Float(x) => {
            if !x.is_finite() {
                return Err(not_a_number());
            }
            if *x < 0.0 {
                return Err(non_negative());
            }
            if x.fract() != 0.0 {
                return Err(ValidationError::Format(
                    "Value must be an integer".to_string(),
                ));
            }
            // 2^64 is exactly representable; anything at or above it overflows
            if *x >= 18_446_744_073_709_551_616.0 {
                return Err(exceeds(bits));
            }
            *x as u64
        }
        PlaintextValue::Text(s) => parse_decimal(s.trim(), bits)?,
        PlaintextValue::Bool(_) => return Err(not_a_number()),
    };

    if n > max_for_bits(bits) {
        return Err(exceeds(bits));
    }
    Ok(n)
}

/// Coerce a value into a boolean (`true`/`false`, `0`/`1`, `"0"`/`"1"`)
pub fn coerce_bool(value: &PlaintextValue) -> Result<bool, ValidationError> {
    match value {
        PlaintextValue::Bool(b) => Ok(*b),
        PlaintextValue::Unsigned(0) | PlaintextValue::Signed(0) => Ok(false),
        PlaintextValue::Unsigned(1) | PlaintextValue::Signed(1) => Ok(true),
        PlaintextValue::Float(x) if *x == 0.0 => Ok(false),
        PlaintextValue::Float(x) if *x == 1.0 => Ok(true),
        PlaintextValue::Text(s) if s == "0" => Ok(false),
        PlaintextValue::Text(s) if s == "1" => Ok(true),
        _ => Err(ValidationError::Format(
            "Value must be a boolean or 0/1".to_string(),
        )),
    }
}

/// Validate an Ethereum-style address: `0x` followed by 40 hex digits
pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    let valid = address.len() == ADDRESS_LENGTH
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ValidationError::Format(
            "Invalid Ethereum address format".to_string(),
        ))
    }
}

/// Validate a ciphertext handle: non-empty `0x`-prefixed hex
pub fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    if handle.is_empty() {
        return Err(ValidationError::Format("Handle cannot be empty".to_string()));
    }
    let digits = handle.strip_prefix("0x").unwrap_or("");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::Format(
            "Handle must be a valid hex string".to_string(),
        ));
    }
    Ok(())
}

/// Largest value representable in `bits` bits
pub fn max_for_bits(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn parse_decimal(s: &str, bits: u32) -> Result<u64, ValidationError> {
    if s.is_empty() {
        return Err(not_a_number());
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(not_a_number());
    }
    if negative {
        return if digits.chars().all(|c| c == '0') {
            Ok(0)
        } else {
            Err(non_negative())
        };
    }
    // All digits but too long for u64
    digits.parse::<u64>().map_err(|_| exceeds(bits))
}

fn not_a_number() -> ValidationError {
    ValidationError::Format("Value must be a number".to_string())
}

fn non_negative() -> ValidationError {
    ValidationError::Range("Value must be non-negative".to_string())
}

fn exceeds(bits: u32) -> ValidationError {
    ValidationError::Range(format!(
        "Value exceeds maximum for uint{}: {}",
        bits,
        max_for_bits(bits)
    ))
}
