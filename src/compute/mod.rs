// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Homomorphic computation submissions
//!
//! The computation itself runs on-chain against encrypted operands. This
//! module only checks that a submission is well-formed and acknowledges it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::codec::{validate_address, validate_handle};
use crate::error::ValidationError;

pub const MIN_OPERANDS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Compare,
    Min,
    Max,
    And,
    Or,
    Xor,
}

impl ComputeOperation {
    pub const ALL: [ComputeOperation; 10] = [
        ComputeOperation::Add,
        ComputeOperation::Subtract,
        ComputeOperation::Multiply,
        ComputeOperation::Divide,
        ComputeOperation::Compare,
        ComputeOperation::Min,
        ComputeOperation::Max,
        ComputeOperation::And,
        ComputeOperation::Or,
        ComputeOperation::Xor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeOperation::Add => "add",
            ComputeOperation::Subtract => "subtract",
            ComputeOperation::Multiply => "multiply",
            ComputeOperation::Divide => "divide",
            ComputeOperation::Compare => "compare",
            ComputeOperation::Min => "min",
            ComputeOperation::Max => "max",
            ComputeOperation::And => "and",
            ComputeOperation::Or => "or",
            ComputeOperation::Xor => "xor",
        }
    }
}

impl fmt::Display for ComputeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputeOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComputeOperation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ValidationError::Format(format!("unknown operation: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub operands: Vec<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeAck {
    pub success: bool,
    pub message: String,
    pub operation: ComputeOperation,
    pub operand_count: usize,
}

/// Validate a submission and acknowledge it
pub fn submit(request: &ComputeRequest) -> Result<ComputeAck, ValidationError> {
    if request.operation.is_empty() {
        return Err(ValidationError::Format(
            "Operation is required (add, subtract, multiply, compare, etc.)".to_string(),
        ));
    }
    let operation: ComputeOperation = request.operation.parse()?;

    if request.operands.len() < MIN_OPERANDS {
        return Err(ValidationError::Range(
            "At least two operands are required".to_string(),
        ));
    }
    for operand in &request.operands {
        validate_handle(operand)?;
    }
    if let Some(contract) = &request.contract_address {
        validate_address(contract)?;
    }

    info!(
        "Accepted {} computation over {} operands",
        operation,
        request.operands.len()
    );
    Ok(ComputeAck {
        success: true,
        message: "Computation submitted to smart contract".to_string(),
        operation,
        operand_count: request.operands.len(),
    })
}
