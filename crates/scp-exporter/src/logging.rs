// Global tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use scp_config::{LogConfig, LogFormat};

use crate::error::ExporterError;

/// Install the subscriber. `RUST_LOG`, when set and valid, wins over the
/// configured level.
pub fn init(config: &LogConfig) -> Result<(), ExporterError> {
    let configured = EnvFilter::try_new(&config.level).map_err(|source| ExporterError::Logging {
        filter: config.level.clone(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Logfmt => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
