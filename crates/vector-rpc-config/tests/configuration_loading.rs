//! Layered configuration loading through files, environment and flags.

use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::Utf8PathBuf;
use once_cell::sync::Lazy;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use vector_rpc_config::{
    ApiName, ConfigError, ConfigLoader, FileConfigLoader, LogFormat, RpcConfig,
    default_log_filter, default_log_format,
};

/// Serialises tests that read or mutate `VECTOR_RPC_*` variables.
static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct ConfigDir {
    temp_dir: TempDir,
    env_overrides: Vec<(&'static str, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl ConfigDir {
    fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write configuration");
        Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path")
    }

    fn set_env(&mut self, key: &'static str, value: &str) {
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` in edition 2024. The mutex keeps
        // other tests in this binary from observing it and `Drop` restores it.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides.push((key, previous));
    }
}

impl Drop for ConfigDir {
    fn drop(&mut self) {
        while let Some((key, value)) = self.env_overrides.pop() {
            match value {
                Some(previous) => unsafe { std::env::set_var(key, previous) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

#[fixture]
fn config_dir() -> ConfigDir {
    let guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
    ConfigDir {
        temp_dir: TempDir::new().expect("create temp dir"),
        env_overrides: Vec::new(),
        _guard: guard,
    }
}

#[rstest]
fn loads_every_field_from_file(config_dir: ConfigDir) {
    let path = config_dir.write(
        "vector-rpc.toml",
        concat!(
            "log_filter = \"vector_rpc=debug\"\n",
            "log_format = \"compact\"\n",
            "apis = [\"miner\"]\n",
            "max_request_bytes = 4096\n",
            "miner_threads = 8\n",
        ),
    );

    let loader = FileConfigLoader::new(path.clone());
    assert_eq!(loader.path(), path.as_path());
    let config = loader.load().expect("load configuration");

    assert_eq!(config.log_filter(), "vector_rpc=debug");
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.apis.as_slice(), &[ApiName::Miner]);
    assert_eq!(config.max_request_bytes, 4096);
    assert_eq!(config.miner_threads, Some(8));
}

#[rstest]
fn empty_file_yields_defaults(config_dir: ConfigDir) {
    let path = config_dir.write("empty.toml", "");
    let config = FileConfigLoader::new(path)
        .load()
        .expect("load configuration");

    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert_eq!(config, RpcConfig::default());
}

#[rstest]
fn environment_overrides_file_values(mut config_dir: ConfigDir) {
    let path = config_dir.write(
        "vector-rpc.toml",
        concat!(
            "log_format = \"json\"\n",
            "apis = [\"net\"]\n",
            "max_request_bytes = 4096\n",
            "miner_threads = 8\n",
        ),
    );
    config_dir.set_env("VECTOR_RPC_LOG_FORMAT", "compact");
    config_dir.set_env("VECTOR_RPC_MINER_THREADS", "2");
    config_dir.set_env("VECTOR_RPC_APIS", "miner");

    let config = FileConfigLoader::new(path)
        .load()
        .expect("load configuration");

    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.miner_threads, Some(2));
    assert_eq!(config.apis.as_slice(), &[ApiName::Miner]);
    assert_eq!(config.max_request_bytes, 4096);
}

#[rstest]
fn command_line_overrides_environment(mut config_dir: ConfigDir) {
    let path = config_dir.write("vector-rpc.toml", "log_format = \"json\"\n");
    config_dir.set_env("VECTOR_RPC_LOG_FORMAT", "compact");

    let config = RpcConfig::load_validated([
        OsString::from("vector-rpc"),
        OsString::from("--config-path"),
        OsString::from(path.as_str()),
        OsString::from("--log-format"),
        OsString::from("json"),
    ])
    .expect("load configuration");

    assert_eq!(config.log_format(), LogFormat::Json);
}

#[rstest]
fn reports_missing_file(config_dir: ConfigDir) {
    let path = Utf8PathBuf::from_path_buf(config_dir.temp_dir.path().join("absent.toml"))
        .expect("utf-8 temp path");
    let error = FileConfigLoader::new(path)
        .load()
        .expect_err("file does not exist");
    assert!(matches!(error, ConfigError::Read { .. }));
    assert!(error.to_string().contains("absent.toml"));
}

#[rstest]
fn reports_unknown_api_in_file(config_dir: ConfigDir) {
    let path = config_dir.write("bad.toml", "apis = [\"net\", \"admin\"]\n");
    let error = FileConfigLoader::new(path)
        .load()
        .expect_err("admin is not a module");
    assert!(matches!(error, ConfigError::Load { .. }));
}

#[rstest]
fn rejects_out_of_range_values(mut config_dir: ConfigDir) {
    let path = config_dir.write("vector-rpc.toml", "max_request_bytes = 4096\n");
    config_dir.set_env("VECTOR_RPC_MAX_REQUEST_BYTES", "0");

    let error = FileConfigLoader::new(path)
        .load()
        .expect_err("zero limit is invalid");
    assert!(matches!(error, ConfigError::Invalid { .. }));
}
