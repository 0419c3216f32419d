//! Argument structs for the `miner` module.
//!
//! Each struct owns one explicit `parse` function taking the raw `params`
//! value. Handlers call it before touching the miner handle, so a request
//! that fails to decode never changes miner state.

use num_bigint::BigInt;
use serde_json::Value;

use super::address::Address;
use super::number::{parse_block_height, parse_number, to_i64};
use super::{positional, require};
use crate::errors::RpcError;

/// Parsed arguments for `miner_start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartMinerArgs {
    /// Requested worker threads; [`StartMinerArgs::DEFAULT_THREADS`] when the
    /// client left the choice to the node.
    pub threads: i64,
}

impl StartMinerArgs {
    /// Sentinel meaning "use the node's default thread count".
    pub const DEFAULT_THREADS: i64 = -1;

    /// Decodes `[threads?]`.
    ///
    /// An empty array or a leading `null` selects the default.
    ///
    /// # Errors
    ///
    /// Returns `DecodeParam` when `params` is not an array and `InvalidType`
    /// when the thread count is not a number.
    pub fn parse(params: &Value) -> Result<Self, RpcError> {
        let threads = match positional(params)?.first() {
            None | Some(Value::Null) => Self::DEFAULT_THREADS,
            Some(value) => to_i64("Threads", &parse_number("Threads", value)?)?,
        };
        Ok(Self { threads })
    }

    /// Resolves the thread count to hand to the miner.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for negative counts other than the
    /// default sentinel.
    pub fn resolve_threads(&self, default: usize) -> Result<usize, RpcError> {
        if self.threads == Self::DEFAULT_THREADS {
            return Ok(default);
        }
        usize::try_from(self.threads)
            .map_err(|_| RpcError::validation("Threads", "Threads must not be negative"))
    }
}

/// Parsed arguments for `miner_setExtra`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetExtraArgs {
    /// Extra data to embed in mined blocks.
    pub data: String,
}

impl SetExtraArgs {
    /// Decodes `[data]`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientParams(got, 1)` for an empty array and
    /// `InvalidType("Price", "not a string")` for a non-string element.
    pub fn parse(params: &Value) -> Result<Self, RpcError> {
        let items = positional(params)?;
        let first = require(items, 1)?;
        // Clients match on the field name `Price` for this method.
        let data = first
            .as_str()
            .ok_or_else(|| RpcError::invalid_type("Price", "not a string"))?;
        Ok(Self {
            data: data.to_owned(),
        })
    }
}

/// Parsed arguments for `miner_setGasPrice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPriceArgs {
    /// Minimum accepted gas price.
    pub price: BigInt,
}

impl GasPriceArgs {
    /// Decodes `[price]` where `price` is a decimal or hex string.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientParams(got, 1)` for an empty array,
    /// `InvalidType("Price", "not a string")` for a non-string element and
    /// `InvalidType("Price", "not a valid number")` for an unparsable string.
    pub fn parse(params: &Value) -> Result<Self, RpcError> {
        let items = positional(params)?;
        let first = require(items, 1)?;
        if !first.is_string() {
            return Err(RpcError::invalid_type("Price", "not a string"));
        }
        Ok(Self {
            price: parse_number("Price", first)?,
        })
    }
}

/// Parsed arguments for `miner_setVecbase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetVecbaseArgs {
    /// Address receiving block rewards.
    pub vecbase: Address,
}

impl SetVecbaseArgs {
    /// Decodes `[address]`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientParams(got, 1)` for an empty array,
    /// `InvalidType("Vecbase", "not a string")` for a non-string element and
    /// `InvalidType("Vecbase", "not a valid address")` when the string is not
    /// hex or decodes to the zero address.
    pub fn parse(params: &Value) -> Result<Self, RpcError> {
        let items = positional(params)?;
        let first = require(items, 1)?;
        let text = first
            .as_str()
            .ok_or_else(|| RpcError::invalid_type("Vecbase", "not a string"))?;
        let vecbase = text
            .parse::<Address>()
            .ok()
            .filter(|address| !address.is_zero())
            .ok_or_else(|| RpcError::invalid_type("Vecbase", "not a valid address"))?;
        Ok(Self { vecbase })
    }
}

/// Parsed arguments for `miner_makeDAG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeDagArgs {
    /// Block whose epoch DAG should be generated; negative values are the
    /// named-height sentinels.
    pub block_number: i64,
}

impl MakeDagArgs {
    /// Decodes `[blockHeight]`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientParams(got, 1)` for an empty array and
    /// `InvalidType("BlockNumber", ..)` for a malformed height.
    pub fn parse(params: &Value) -> Result<Self, RpcError> {
        let items = positional(params)?;
        let first = require(items, 1)?;
        Ok(Self {
            block_number: parse_block_height("BlockNumber", first)?,
        })
    }

    /// Returns the block number as an unsigned height.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for negative heights, including the
    /// `latest` and `pending` sentinels.
    pub fn height(&self) -> Result<u64, RpcError> {
        u64::try_from(self.block_number)
            .map_err(|_| RpcError::validation("BlockNumber", "BlockNumber must be positive"))
    }
}

impl Default for MakeDagArgs {
    fn default() -> Self {
        Self { block_number: -1 }
    }
}
