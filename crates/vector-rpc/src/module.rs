//! The capability-module contract and its per-instance routing table.
//!
//! A capability module is a named, versioned group of methods. Each concrete
//! module builds a [`MethodTable`] in its constructor, binding method names to
//! plain function handlers. The table is never mutated afterwards, so a
//! module can be shared across request threads without locking.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde_json::Value;

use crate::errors::RpcError;
use crate::request::Request;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = "vector_rpc::dispatch";

/// A named, versioned collection of RPC methods.
pub trait CapabilityModule: Send + Sync {
    /// Module name, e.g. `net`.
    fn name(&self) -> &str;

    /// Version of the module's method set.
    fn api_version(&self) -> &str;

    /// Every method this module routes.
    fn methods(&self) -> BTreeSet<&str>;

    /// Executes a request owned by this module.
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented` when the method is not routed here, or the
    /// handler's own error otherwise.
    fn execute(&self, request: &Request) -> Result<Value, RpcError>;
}

/// Handler bound to a method name.
pub type Handler<M> = fn(&M, &Request) -> Result<Value, RpcError>;

/// Immutable method-name to handler table owned by one module instance.
pub struct MethodTable<M> {
    handlers: HashMap<&'static str, Handler<M>>,
}

impl<M> MethodTable<M> {
    /// Builds a table from `(method, handler)` pairs.
    ///
    /// A repeated method name keeps its first handler.
    #[must_use]
    pub fn new(entries: &[(&'static str, Handler<M>)]) -> Self {
        let mut handlers = HashMap::with_capacity(entries.len());
        for (method, handler) in entries {
            handlers.entry(*method).or_insert(*handler);
        }
        Self { handlers }
    }

    /// Method names routed by this table.
    #[must_use]
    pub fn methods(&self) -> BTreeSet<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// Whether `method` is routed by this table.
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Invokes the handler bound to `request.method`.
    ///
    /// The handler's result is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented(method)` when no handler is bound.
    pub fn dispatch(&self, module: &M, request: &Request) -> Result<Value, RpcError> {
        match self.handlers.get(request.method.as_str()) {
            Some(handler) => handler(module, request),
            None => Err(RpcError::not_implemented(request.method.as_str())),
        }
    }
}

impl<M> fmt::Debug for MethodTable<M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MethodTable")
            .field("methods", &self.methods())
            .finish()
    }
}
