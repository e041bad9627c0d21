//! Daemon configuration
//!
//! Everything is read from environment variables:
//!
//! - `NETPROBE_HOST` / `NETPROBE_PORT`: bind address (default `0.0.0.0:8080`)
//! - `NETPROBE_STATIC_DIR`: frontend directory (default `./frontend/build`, `~` expanded)
//! - `NETPROBE_LOG_FORMAT`: `json` or `pretty` (default)
//! - `NETPROBE_LOG_DIR`: directory for daily-rolling JSON logs (`~` expanded)
//! - `NETPROBE_{FETCH,PING,TRACEROUTE,CUSTOM}_TIMEOUT_SECS`: per-kind deadline overrides

use netprobe_api_http::HttpServerConfig;
use netprobe_core::application::CapabilityTable;
use netprobe_core::domain::{DiagnosticKind, Platform};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "./frontend/build";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Timeout override rejected: {0}")]
    Timeout(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty, coloured output for development
    Pretty,
    /// JSON lines for production
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
    pub timeout_overrides: Vec<(DiagnosticKind, Duration)>,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("NETPROBE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("NETPROBE_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "NETPROBE_PORT",
                value,
                expected: "a port number (0-65535)",
            })?,
            None => DEFAULT_PORT,
        };

        let static_dir = expand_path(
            &lookup("NETPROBE_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        );

        let log_format = match lookup("NETPROBE_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let log_dir = lookup("NETPROBE_LOG_DIR")
            .filter(|value| !value.is_empty())
            .map(|value| expand_path(&value));

        let mut timeout_overrides = Vec::new();
        for (kind, var) in [
            (DiagnosticKind::Fetch, "NETPROBE_FETCH_TIMEOUT_SECS"),
            (DiagnosticKind::Ping, "NETPROBE_PING_TIMEOUT_SECS"),
            (DiagnosticKind::Traceroute, "NETPROBE_TRACEROUTE_TIMEOUT_SECS"),
            (DiagnosticKind::Custom, "NETPROBE_CUSTOM_TIMEOUT_SECS"),
        ] {
            if let Some(value) = lookup(var) {
                let secs: u64 = value
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::Invalid {
                        var,
                        value,
                        expected: "a positive number of seconds",
                    })?;
                timeout_overrides.push((kind, Duration::from_secs(secs)));
            }
        }

        Ok(Self {
            host,
            port,
            static_dir,
            log_format,
            log_dir,
            timeout_overrides,
        })
    }

    /// Capability table for `platform` with any deadline overrides applied
    pub fn capability_table(&self, platform: &Platform) -> Result<CapabilityTable, ConfigError> {
        self.timeout_overrides.iter().try_fold(
            CapabilityTable::for_platform(platform),
            |table, (kind, deadline)| {
                table
                    .with_deadline(*kind, *deadline)
                    .map_err(|e| ConfigError::Timeout(e.to_string()))
            },
        )
    }

    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            static_dir: self.static_dir.clone(),
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
