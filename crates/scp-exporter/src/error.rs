//! Startup error types with miette diagnostics.
//!
//! Anything that stops the exporter before it can serve ends up here and
//! is reported once on stderr before the process exits.

use std::net::SocketAddr;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use scp_config::ConfigError;
use scp_core::CoreError;

/// Process exit codes. Usage errors (2) are raised by clap itself.
pub mod exit_code {
    pub const FAILURE: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExporterError {
    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(scp::config),
        help(
            "Settings come from flags, SCP_* environment variables and --config.file.\n\
             Run: scp-exporter --help"
        )
    )]
    Config(#[from] ConfigError),

    #[error("invalid log filter {filter:?}")]
    #[diagnostic(
        code(scp::logging),
        help("Use one of debug, info, warn or error.")
    )]
    Logging {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    // ── Upstream ─────────────────────────────────────────────────────
    #[error("failed to create API client")]
    #[diagnostic(code(scp::client))]
    Client(#[from] scp_api::Error),

    #[error("failed to register metrics")]
    #[diagnostic(code(scp::metrics))]
    Metrics(#[from] CoreError),

    // ── Listener ─────────────────────────────────────────────────────
    #[error("unable to load TLS certificate {} / key {}", cert.display(), key.display())]
    #[diagnostic(
        code(scp::tls),
        help("Check cert_file and key_file in the web config; both must be PEM.")
    )]
    Tls {
        cert: PathBuf,
        key: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("server on {addr} failed")]
    #[diagnostic(code(scp::serve))]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
