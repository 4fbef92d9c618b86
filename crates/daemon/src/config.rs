//! Daemon configuration from environment variables

use anyhow::Result;
use drainq_api_rpc::{HttpServerConfig, RpcServerConfig};
use drainq_core::application::constants::{
    DEFAULT_IDLE_SWEEP_INTERVAL, DEFAULT_IDLE_THRESHOLD, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_STATUS_INTERVAL,
};
use drainq_core::StoreConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Everything the composition root needs
#[derive(Debug)]
pub struct DaemonConfig {
    pub store: StoreConfig,
    /// None disables the status reporter
    pub status_interval: Option<Duration>,
    pub http: HttpServerConfig,
    pub rpc: RpcServerConfig,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = StoreConfig::new(
            parse_or(&lookup, "DRAINQ_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY),
            Duration::from_secs(parse_or(
                &lookup,
                "DRAINQ_IDLE_THRESHOLD_SECS",
                DEFAULT_IDLE_THRESHOLD.as_secs(),
            )),
            Duration::from_secs(parse_or(
                &lookup,
                "DRAINQ_IDLE_SWEEP_INTERVAL_SECS",
                DEFAULT_IDLE_SWEEP_INTERVAL.as_secs(),
            )),
        )?;

        let status_secs: u64 = parse_or(
            &lookup,
            "DRAINQ_STATUS_INTERVAL_SECS",
            DEFAULT_STATUS_INTERVAL.as_secs(),
        );
        let status_interval = (status_secs > 0).then(|| Duration::from_secs(status_secs));

        // Listener defaults live with the servers; DRAINQ_HOST binds both
        let http_defaults = HttpServerConfig::default();
        let rpc_defaults = RpcServerConfig::default();
        let host = lookup("DRAINQ_HOST");

        Ok(Self {
            store,
            status_interval,
            http: HttpServerConfig {
                host: host.clone().unwrap_or(http_defaults.host),
                port: parse_or(&lookup, "DRAINQ_HTTP_PORT", http_defaults.port),
            },
            rpc: RpcServerConfig {
                host: host.unwrap_or(rpc_defaults.host),
                port: parse_or(&lookup, "DRAINQ_RPC_PORT", rpc_defaults.port),
            },
        })
    }
}

/// Log format from `DRAINQ_LOG_FORMAT` (read before tracing is up)
pub fn log_format() -> LogFormat {
    match std::env::var("DRAINQ_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparsable setting, using default");
                default
            }
        },
        None => default,
    }
}
