//! Command dispatch for the vector node's remote procedure call surface.
//!
//! A request names a method and carries an untyped positional parameter
//! array. The dispatcher finds the capability module that owns the method,
//! the module decodes the parameters into a typed argument struct, and the
//! handler drives the node through a shared handle. Every failure along the
//! way is reported as an [`RpcError`] value carrying a JSON-RPC code and a
//! structured `data` payload.
//!
//! The crate ships two modules:
//!
//! - `net`: peer count, listening state and network version.
//! - `miner`: start and stop mining, hash rate, extra data, gas price,
//!   reward address and DAG generation.
//!
//! [`merge`] combines any number of modules into a [`MergedApi`] with
//! first-match routing on name collisions. The merged dispatcher is itself a
//! [`CapabilityModule`] and answers the built-in `modules` method with every
//! merged module's version.
//!
//! The [`codec`] module frames requests and responses as JSON lines, and
//! [`bootstrap_with`] wires configuration, telemetry and the enabled modules
//! together.

pub mod args;
mod bootstrap;
pub mod codec;
mod errors;
mod merged;
mod miner;
mod module;
mod net;
mod node;
mod request;
mod telemetry;

pub use bootstrap::{
    BootstrapError, NodeHandles, RpcService, bootstrap_with, build_dispatcher,
    default_miner_threads,
};
pub use codec::{LineHandler, Response};
pub use errors::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, RpcError,
};
pub use merged::{MERGED_API_NAME, MERGED_API_VERSION, MODULES_METHOD, MergedApi, merge};
pub use miner::{MINER_API_NAME, MINER_API_VERSION, MinerApi};
pub use module::{CapabilityModule, Handler, MethodTable};
pub use net::{NET_API_NAME, NET_API_VERSION, NetApi};
pub use node::{MinerControl, NetworkStatus, NodeError};
pub use request::{JSONRPC_VERSION, Request};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};

#[cfg(test)]
mod tests;
