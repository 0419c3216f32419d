//! Shared configuration for the vector node RPC dispatcher.
//!
//! The configuration selects which capability modules are exposed, how the
//! dispatcher logs, how large a single request line may grow, and how many
//! threads the miner uses when a client asks for "the default". Values are
//! layered by `ortho_config`: built-in defaults first, then a TOML file named
//! by `--config-path` or `VECTOR_RPC_CONFIG_PATH`, then `VECTOR_RPC_*`
//! environment variables, then command-line flags such as `--log-format`.

mod apis;
mod defaults;
mod logging;

use std::ffi::OsString;
use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use apis::{ApiList, ApiName, UnknownApiError};
pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_REQUEST_BYTES, default_apis, default_log_filter,
    default_log_filter_string, default_log_format, default_max_request_bytes,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Program name handed to the loader as the first argument.
const PROGRAM_NAME: &str = "vector-rpc";

/// Resolved dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "VECTOR_RPC")]
pub struct RpcConfig {
    /// `tracing` filter expression, e.g. `info` or `vector_rpc=debug`.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log events.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Capability modules to expose, in merge (and therefore priority) order.
    #[serde(default = "default_apis")]
    pub apis: ApiList,
    /// Upper bound on a single request line in bytes, not counting the
    /// terminating newline.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
    /// Thread count used when `miner_start` is called without one. `None`
    /// falls back to the machine's available parallelism.
    #[serde(default)]
    pub miner_threads: Option<usize>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            apis: default_apis(),
            max_request_bytes: default_max_request_bytes(),
            miner_threads: None,
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The named configuration file could not be opened.
    #[error("failed to read configuration '{path}': {source}")]
    Read {
        /// File that was requested.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// A configuration layer could not be parsed or merged.
    #[error("failed to load configuration: {source}")]
    Load {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// A resolved value is out of range.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// Description of the violated constraint.
        message: String,
    },
}

impl From<Arc<OrthoError>> for ConfigError {
    fn from(source: Arc<OrthoError>) -> Self {
        Self::Load { source }
    }
}

impl RpcConfig {
    /// Returns the configured log filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Loads every layer from `args` and the process environment, then
    /// validates the result.
    ///
    /// The first element of `args` is the program name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer cannot be parsed and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn load_validated<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = Self::load_from_iter(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks range constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero request limit or a zero
    /// default miner thread count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_request_bytes == 0 {
            return Err(ConfigError::Invalid {
                message: String::from("max_request_bytes must be greater than zero"),
            });
        }
        if self.miner_threads == Some(0) {
            return Err(ConfigError::Invalid {
                message: String::from("miner_threads must be greater than zero"),
            });
        }
        Ok(())
    }
}

/// Source of the dispatcher configuration.
pub trait ConfigLoader: Send + Sync {
    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration cannot be produced.
    fn load(&self) -> Result<RpcConfig, ConfigError>;
}

/// Loads a TOML file with `VECTOR_RPC_*` environment values layered on top.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    path: Utf8PathBuf,
}

impl FileConfigLoader {
    /// Creates a loader for the given file.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the loader reads from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self) -> Result<RpcConfig, ConfigError> {
        fs::metadata(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        RpcConfig::load_validated([
            OsString::from(PROGRAM_NAME),
            OsString::from("--config-path"),
            OsString::from(self.path.as_str()),
        ])
    }
}

/// Loader that hands out a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigLoader {
    config: RpcConfig,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn new(config: RpcConfig) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<RpcConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}
