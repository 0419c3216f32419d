//! Service bootstrap: configuration, telemetry and dispatcher assembly.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

use thiserror::Error;
use tracing::info;

use vector_rpc_config::{ApiName, ConfigError, ConfigLoader, RpcConfig};

use crate::codec::LineHandler;
use crate::merged::{MergedApi, merge};
use crate::miner::MinerApi;
use crate::module::CapabilityModule;
use crate::net::NetApi;
use crate::node::{MinerControl, NetworkStatus};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

const BOOTSTRAP_TARGET: &str = "vector_rpc::bootstrap";

/// Node subsystems the capability modules are built over.
#[derive(Clone)]
pub struct NodeHandles {
    /// Peer-to-peer status, used by the `net` module.
    pub network: Arc<dyn NetworkStatus>,
    /// Miner control, used by the `miner` module.
    pub miner: Arc<dyn MinerControl>,
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Result of a successful bootstrap.
#[derive(Debug)]
pub struct RpcService {
    config: RpcConfig,
    dispatcher: Arc<MergedApi>,
    telemetry: TelemetryHandle,
}

impl RpcService {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Shared dispatcher over every enabled module.
    #[must_use]
    pub fn dispatcher(&self) -> Arc<MergedApi> {
        Arc::clone(&self.dispatcher)
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Line handler bounded by the configured request size.
    #[must_use]
    pub fn line_handler(&self) -> LineHandler {
        LineHandler::new(self.dispatcher(), self.config.max_request_bytes)
    }
}

/// Thread count `miner_start` uses when the client passes none.
///
/// Falls back to the machine's available parallelism, or one thread when
/// that cannot be determined.
#[must_use]
pub fn default_miner_threads(config: &RpcConfig) -> usize {
    config.miner_threads.unwrap_or_else(|| {
        thread::available_parallelism().map_or(1, NonZeroUsize::get)
    })
}

/// Builds the dispatcher for the APIs enabled in `config`.
///
/// Modules are merged in the configured order, so earlier APIs win method
/// name collisions.
#[must_use]
pub fn build_dispatcher(config: &RpcConfig, handles: &NodeHandles) -> MergedApi {
    let modules = config
        .apis
        .iter()
        .map(|api| -> Box<dyn CapabilityModule> {
            match api {
                ApiName::Net => Box::new(NetApi::new(Arc::clone(&handles.network))),
                ApiName::Miner => Box::new(MinerApi::new(
                    Arc::clone(&handles.miner),
                    default_miner_threads(config),
                )),
            }
        })
        .collect();
    merge(modules)
}

/// Bootstraps the service using the supplied collaborators.
///
/// # Errors
///
/// Returns [`BootstrapError::Configuration`] when the loader fails and
/// [`BootstrapError::Telemetry`] when the subscriber cannot be installed.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    handles: &NodeHandles,
) -> Result<RpcService, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    let dispatcher = Arc::new(build_dispatcher(&config, handles));
    info!(
        target: BOOTSTRAP_TARGET,
        modules = ?dispatcher.versions(),
        max_request_bytes = config.max_request_bytes,
        "dispatcher ready"
    );

    Ok(RpcService {
        config,
        dispatcher,
        telemetry,
    })
}
