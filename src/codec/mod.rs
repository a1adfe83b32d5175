// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Type codec: data kinds, plaintext values and their validation rules

pub mod types;
pub mod validation;

pub use types::{DataKind, PlaintextValue};
pub use validation::{
    coerce_bool, coerce_uint, max_for_bits, validate, validate_address, validate_handle,
    ADDRESS_LENGTH,
};
