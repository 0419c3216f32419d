//! Handles onto the node subsystems the capability modules drive.
//!
//! The dispatcher never owns node state. Each module is constructed with a
//! shared handle implementing one of the traits below; implementations must
//! be safe to call from several request threads at once.

use num_bigint::BigInt;
use thiserror::Error;

use crate::args::Address;

/// Failure reported by a node handle.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NodeError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl NodeError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Read-only view of the node's peer-to-peer layer.
pub trait NetworkStatus: Send + Sync {
    /// Number of currently connected peers.
    fn peer_count(&self) -> usize;

    /// Whether the node accepts inbound connections.
    fn is_listening(&self) -> bool;

    /// Identifier of the network the node is joined to.
    fn network_version(&self) -> String;
}

/// Control surface of the node's miner.
pub trait MinerControl: Send + Sync {
    /// Starts mining on `threads` worker threads.
    fn start_mining(&self, threads: usize) -> Result<(), NodeError>;

    /// Stops mining. Stopping an idle miner is a no-op.
    fn stop_mining(&self);

    /// Current hash rate in hashes per second.
    fn hashrate(&self) -> u64;

    /// Replaces the extra data embedded in mined blocks.
    fn set_extra(&self, extra: &[u8]) -> Result<(), NodeError>;

    /// Sets the minimum gas price accepted for mined transactions.
    fn set_gas_price(&self, price: BigInt);

    /// Sets the address that receives block rewards.
    fn set_vecbase(&self, address: Address);

    /// Enables automatic DAG generation ahead of epoch changes.
    fn start_auto_dag(&self);

    /// Disables automatic DAG generation.
    fn stop_auto_dag(&self);

    /// Generates the proof-of-work DAG for the epoch containing `block_number`.
    fn make_dag(&self, block_number: u64) -> Result<(), NodeError>;
}
