//! Configuration for the relay server.
//!
//! Defaults can be overridden via environment variables (and, in the
//! binary, by command-line flags on top of those):
//!
//! - `RELAY_BIND_ADDR`         (default: "0.0.0.0")
//! - `RELAY_PORT`              (default: "8000")
//! - `RELAY_MAX_CLIENTS`       (default: "1024")
//! - `RELAY_OUTBOUND_CAPACITY` (default: "64")
//! - `RELAY_SEND_TIMEOUT_MS`   (default: "5000")
//! - `RELAY_LOG`               (default: "info")

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously registered connections.
    pub max_clients: usize,

    /// Frames that may queue for one client before broadcasts to it are
    /// dropped.
    pub outbound_capacity: usize,

    /// Upper bound on a single socket write.
    pub send_timeout: Duration,

    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 8000,
            max_clients: 1024,
            outbound_capacity: 64,
            send_timeout: Duration::from_millis(5000),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Config {
            bind_addr: lookup("RELAY_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: read_or_default(&lookup, "RELAY_PORT", defaults.port)?,
            max_clients: read_or_default(&lookup, "RELAY_MAX_CLIENTS", defaults.max_clients)?,
            outbound_capacity: read_or_default(
                &lookup,
                "RELAY_OUTBOUND_CAPACITY",
                defaults.outbound_capacity,
            )?,
            send_timeout: Duration::from_millis(read_or_default(
                &lookup,
                "RELAY_SEND_TIMEOUT_MS",
                defaults.send_timeout.as_millis() as u64,
            )?),
            log_level: lookup("RELAY_LOG").unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_clients == 0 {
            bail!("max_clients must be at least 1");
        }
        if self.outbound_capacity == 0 {
            bail!("outbound_capacity must be at least 1");
        }
        if self.send_timeout.is_zero() {
            bail!("send_timeout must be non-zero");
        }
        Ok(())
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value {val:?} for {key}")),
        None => Ok(default),
    }
}
