//! Clap derive definitions for the `scp-exporter` binary.
//!
//! Every flag is optional here; unset flags fall through to the config
//! file, the environment and finally the built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "scp-exporter",
    version,
    about = "Prometheus exporter for netcup's Server Control Panel",
    long_about = "Exporting Metrics from Netcup's ServerControlPanel.\n\n\
        Each scrape of the metrics path queries the upstream API and \
        republishes server state as Prometheus gauges."
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long = "config.file", value_name = "PATH", env = "SCP_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Upstream API flavour
    #[arg(long, env = "SCP_API", value_parser = ["rest", "soap"])]
    pub api: Option<String>,

    /// API refresh token (REST)
    #[arg(long, env = "SCP_REFRESHTOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Customer number (SOAP)
    #[arg(long, env = "SCP_LOGINNAME")]
    pub login_name: Option<String>,

    /// Web service password (SOAP)
    #[arg(long, env = "SCP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// The address to listen on for HTTP requests
    #[arg(long, env = "SCP_LISTENADDRESS", value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path", value_name = "PATH")]
    pub metrics_path: Option<String>,

    /// Path to TLS config file
    #[arg(
        long = "tls-config",
        visible_alias = "web.config.file",
        env = "SCP_TLSCONFIG",
        value_name = "PATH"
    )]
    pub tls_config: Option<PathBuf>,

    /// Upstream request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Only log messages with the given severity or above
    #[arg(long = "log.level", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    /// Output format of log messages
    #[arg(long = "log.format", value_parser = ["logfmt", "json"])]
    pub log_format: Option<String>,
}

/// Flag values in config-key shape, merged over the other layers.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    api: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    listen_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tls_config: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "LogOverrides::is_empty")]
    log: LogOverrides,
}

#[derive(Debug, Default, Serialize)]
struct LogOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

impl LogOverrides {
    fn is_empty(&self) -> bool {
        self.level.is_none() && self.format.is_none()
    }
}

/// Drop empty values so an exported-but-blank variable does not shadow
/// the config file.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api: non_empty(self.api.as_ref()),
            refresh_token: non_empty(self.refresh_token.as_ref()),
            login_name: non_empty(self.login_name.as_ref()),
            password: non_empty(self.password.as_ref()),
            listen_address: non_empty(self.listen_address.as_ref()),
            metrics_path: non_empty(self.metrics_path.as_ref()),
            tls_config: self
                .tls_config
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            timeout_secs: self.timeout,
            log: LogOverrides {
                level: non_empty(self.log_level.as_ref()),
                format: non_empty(self.log_format.as_ref()),
            },
        }
    }
}
