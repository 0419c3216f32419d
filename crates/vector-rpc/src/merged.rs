//! Aggregation of capability modules into one dispatcher.
//!
//! [`merge`] takes modules in priority order and computes a single route
//! table once. When two modules declare the same method, the module merged
//! first keeps it and the later declaration is logged and ignored. The
//! merged dispatcher is itself a [`CapabilityModule`], so dispatchers nest.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::RpcError;
use crate::module::{CapabilityModule, DISPATCH_TARGET};
use crate::request::Request;

/// Name reported by a merged dispatcher.
pub const MERGED_API_NAME: &str = "merged";
/// Version reported by a merged dispatcher.
pub const MERGED_API_VERSION: &str = "1.0";
/// Built-in method listing every merged module with its version.
pub const MODULES_METHOD: &str = "modules";

/// Merges `modules` into a single dispatcher.
///
/// Modules earlier in the list take precedence on method name collisions.
#[must_use]
pub fn merge(modules: Vec<Box<dyn CapabilityModule>>) -> MergedApi {
    MergedApi::new(modules)
}

/// Dispatcher exposing the union of several modules' methods.
pub struct MergedApi {
    modules: Vec<Box<dyn CapabilityModule>>,
    routes: HashMap<String, usize>,
    versions: BTreeMap<String, String>,
}

impl MergedApi {
    /// Builds the route table for `modules`, first declaration winning.
    #[must_use]
    pub fn new(modules: Vec<Box<dyn CapabilityModule>>) -> Self {
        let mut routes: HashMap<String, usize> = HashMap::new();
        let mut versions = BTreeMap::new();

        for (index, module) in modules.iter().enumerate() {
            versions
                .entry(module.name().to_owned())
                .or_insert_with(|| module.api_version().to_owned());

            for method in module.methods() {
                if let Some(owner) = routes.get(method).and_then(|i| modules.get(*i)) {
                    warn!(
                        target: DISPATCH_TARGET,
                        method,
                        kept = owner.name(),
                        shadowed = module.name(),
                        "method declared by more than one module"
                    );
                    continue;
                }
                routes.insert(method.to_owned(), index);
            }
        }

        Self {
            modules,
            routes,
            versions,
        }
    }

    /// Module names mapped to their API versions.
    #[must_use]
    pub const fn versions(&self) -> &BTreeMap<String, String> {
        &self.versions
    }

    /// Name of the module that serves `method`, if any.
    #[must_use]
    pub fn owner_of(&self, method: &str) -> Option<&str> {
        self.owning_module(method).map(|module| module.name())
    }

    fn owning_module(&self, method: &str) -> Option<&dyn CapabilityModule> {
        self.routes
            .get(method)
            .and_then(|index| self.modules.get(*index))
            .map(|module| &**module)
    }
}

impl CapabilityModule for MergedApi {
    fn name(&self) -> &str {
        MERGED_API_NAME
    }

    fn api_version(&self) -> &str {
        MERGED_API_VERSION
    }

    fn methods(&self) -> BTreeSet<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    fn execute(&self, request: &Request) -> Result<Value, RpcError> {
        debug!(
            target: DISPATCH_TARGET,
            method = request.method.as_str(),
            params = %request.params,
            "routing request"
        );

        if request.method == MODULES_METHOD {
            return Ok(serde_json::to_value(&self.versions)?);
        }

        match self.owning_module(&request.method) {
            Some(module) => module.execute(request),
            None => Err(RpcError::not_implemented(request.method.as_str())),
        }
    }
}

impl fmt::Debug for MergedApi {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MergedApi")
            .field("versions", &self.versions)
            .field("methods", &self.methods())
            .finish_non_exhaustive()
    }
}
