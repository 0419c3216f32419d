//! The `miner` capability module.
//!
//! Every handler that takes input decodes its argument struct first and only
//! then calls into the miner handle. Failures reported by the handle are
//! returned as [`RpcError::Node`] without retry.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::args::{GasPriceArgs, MakeDagArgs, SetExtraArgs, SetVecbaseArgs, StartMinerArgs};
use crate::errors::RpcError;
use crate::module::{CapabilityModule, DISPATCH_TARGET, Handler, MethodTable};
use crate::node::MinerControl;
use crate::request::Request;

/// Module name reported by `modules`.
pub const MINER_API_NAME: &str = "miner";
/// Version of the `miner` method set.
pub const MINER_API_VERSION: &str = "1.0";

/// Serves the `miner_*` methods.
pub struct MinerApi {
    miner: Arc<dyn MinerControl>,
    default_threads: usize,
    methods: MethodTable<Self>,
}

impl MinerApi {
    /// Creates the module over a miner handle.
    ///
    /// `default_threads` is used when `miner_start` is called without a
    /// thread count.
    #[must_use]
    pub fn new(miner: Arc<dyn MinerControl>, default_threads: usize) -> Self {
        let methods = MethodTable::new(&[
            ("miner_hashrate", Self::hashrate as Handler<Self>),
            ("miner_makeDAG", Self::make_dag),
            ("miner_setExtra", Self::set_extra),
            ("miner_setGasPrice", Self::set_gas_price),
            ("miner_setVecbase", Self::set_vecbase),
            ("miner_startAutoDAG", Self::start_auto_dag),
            ("miner_start", Self::start_miner),
            ("miner_stop", Self::stop_miner),
            ("miner_stopAutoDAG", Self::stop_auto_dag),
        ]);
        Self {
            miner,
            default_threads,
            methods,
        }
    }

    /// Thread count used for `miner_start` without arguments.
    #[must_use]
    pub const fn default_threads(&self) -> usize {
        self.default_threads
    }

    fn start_miner(&self, request: &Request) -> Result<Value, RpcError> {
        let args = StartMinerArgs::parse(&request.params)?;
        let threads = args.resolve_threads(self.default_threads)?;
        debug!(target: DISPATCH_TARGET, threads, "starting miner");
        self.miner.start_auto_dag();
        self.miner.start_mining(threads)?;
        Ok(Value::Bool(true))
    }

    fn stop_miner(&self, _request: &Request) -> Result<Value, RpcError> {
        self.miner.stop_mining();
        Ok(Value::Bool(true))
    }

    fn hashrate(&self, _request: &Request) -> Result<Value, RpcError> {
        Ok(Value::from(self.miner.hashrate()))
    }

    fn set_extra(&self, request: &Request) -> Result<Value, RpcError> {
        let args = SetExtraArgs::parse(&request.params)?;
        self.miner.set_extra(args.data.as_bytes())?;
        Ok(Value::Bool(true))
    }

    fn set_gas_price(&self, request: &Request) -> Result<Value, RpcError> {
        let args = GasPriceArgs::parse(&request.params)?;
        self.miner.set_gas_price(args.price);
        Ok(Value::Bool(true))
    }

    fn set_vecbase(&self, request: &Request) -> Result<Value, RpcError> {
        let args = SetVecbaseArgs::parse(&request.params)?;
        self.miner.set_vecbase(args.vecbase);
        Ok(Value::Null)
    }

    fn start_auto_dag(&self, _request: &Request) -> Result<Value, RpcError> {
        self.miner.start_auto_dag();
        Ok(Value::Bool(true))
    }

    fn stop_auto_dag(&self, _request: &Request) -> Result<Value, RpcError> {
        self.miner.stop_auto_dag();
        Ok(Value::Bool(true))
    }

    fn make_dag(&self, request: &Request) -> Result<Value, RpcError> {
        let args = MakeDagArgs::parse(&request.params)?;
        let height = args.height()?;
        debug!(target: DISPATCH_TARGET, height, "generating DAG");
        self.miner.make_dag(height)?;
        Ok(Value::Bool(true))
    }
}

impl CapabilityModule for MinerApi {
    fn name(&self) -> &str {
        MINER_API_NAME
    }

    fn api_version(&self) -> &str {
        MINER_API_VERSION
    }

    fn methods(&self) -> BTreeSet<&str> {
        self.methods.methods()
    }

    fn execute(&self, request: &Request) -> Result<Value, RpcError> {
        self.methods.dispatch(self, request)
    }
}

impl fmt::Debug for MinerApi {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MinerApi")
            .field("default_threads", &self.default_threads)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}
