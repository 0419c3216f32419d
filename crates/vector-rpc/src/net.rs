//! The `net` capability module: read-only network status queries.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::RpcError;
use crate::module::{CapabilityModule, Handler, MethodTable};
use crate::node::NetworkStatus;
use crate::request::Request;

/// Module name reported by `modules`.
pub const NET_API_NAME: &str = "net";
/// Version of the `net` method set.
pub const NET_API_VERSION: &str = "1.0";

/// Serves `net_peerCount`, `net_listening` and `net_version`.
pub struct NetApi {
    network: Arc<dyn NetworkStatus>,
    methods: MethodTable<Self>,
}

impl NetApi {
    /// Creates the module over a network status handle.
    #[must_use]
    pub fn new(network: Arc<dyn NetworkStatus>) -> Self {
        let methods = MethodTable::new(&[
            ("net_peerCount", Self::peer_count as Handler<Self>),
            ("net_listening", Self::is_listening),
            ("net_version", Self::version),
        ]);
        Self { network, methods }
    }

    fn peer_count(&self, _request: &Request) -> Result<Value, RpcError> {
        Ok(Value::from(self.network.peer_count()))
    }

    fn is_listening(&self, _request: &Request) -> Result<Value, RpcError> {
        Ok(Value::Bool(self.network.is_listening()))
    }

    fn version(&self, _request: &Request) -> Result<Value, RpcError> {
        Ok(Value::String(self.network.network_version()))
    }
}

impl CapabilityModule for NetApi {
    fn name(&self) -> &str {
        NET_API_NAME
    }

    fn api_version(&self) -> &str {
        NET_API_VERSION
    }

    fn methods(&self) -> BTreeSet<&str> {
        self.methods.methods()
    }

    fn execute(&self, request: &Request) -> Result<Value, RpcError> {
        self.methods.dispatch(self, request)
    }
}

impl fmt::Debug for NetApi {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NetApi")
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}
