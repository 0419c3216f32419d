//! Typed decoding of positional request parameters.
//!
//! Every method that takes input owns an argument struct with an explicit
//! `parse(params)` function. Decoding is a single pass: confirm `params` is a
//! positional array, check its length, coerce each element, apply defaults.
//! Numeric coercion lives in [`number`] so every decoder accepts the same
//! number shapes.

mod address;
mod miner;
pub mod number;

use serde_json::Value;

use crate::errors::RpcError;

pub use address::{ADDRESS_LENGTH, Address};
pub use miner::{GasPriceArgs, MakeDagArgs, SetExtraArgs, SetVecbaseArgs, StartMinerArgs};

/// Views `params` as a positional array.
///
/// JSON `null` (or an omitted `params` member) reads as an empty array.
///
/// # Errors
///
/// Returns `DecodeParam` for any other non-array value.
pub fn positional(params: &Value) -> Result<&[Value], RpcError> {
    match params {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Null => Ok(&[]),
        other => Err(RpcError::decode_param(format!(
            "expected a positional array, found {}",
            json_type(other)
        ))),
    }
}

/// Returns the first element after checking at least `want` are present.
///
/// # Errors
///
/// Returns `InsufficientParams(got, want)` when the array is too short.
pub fn require(items: &[Value], want: usize) -> Result<&Value, RpcError> {
    match items.first() {
        Some(first) if items.len() >= want => Ok(first),
        _ => Err(RpcError::insufficient_params(items.len(), want)),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
