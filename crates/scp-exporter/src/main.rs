mod cli;
mod error;
mod logging;
mod server;

use std::sync::Arc;

use clap::Parser;
use figment::providers::Serialized;
use tracing::{debug, info};

use scp_api::{ScpClient, SoapClient, TokenSource};
use scp_config::{ApiMode, Config, ConfigError};
use scp_core::{LegacyCollector, MetricsRegistry, ScpCollector};

use crate::cli::Cli;
use crate::error::{ExporterError, exit_code};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(exit_code::FAILURE);
    }
}

async fn run(cli: &Cli) -> Result<(), ExporterError> {
    let figment =
        scp_config::figment(cli.config_file.as_deref()).merge(Serialized::defaults(cli.overrides()));
    let mut config = Config::from_figment(&figment)?;

    logging::init(&config.log)?;
    info!(version = server::VERSION, api = %config.api, "starting scp-exporter");

    // axum-server's rustls needs a process-wide provider.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let addr = config.listen_addr()?;
    let web = config.web_config()?;
    let registry = build_registry(&mut config)?;

    let app = server::router(Arc::new(registry), &config.metrics_path);
    debug!(metrics_path = %config.metrics_path, "routes ready");
    server::serve(addr, app, web.as_ref().and_then(|w| w.tls())).await
}

/// Build the upstream client for the configured API and register its
/// collector. Credentials are moved out of `config`.
fn build_registry(config: &mut Config) -> Result<MetricsRegistry, ExporterError> {
    let mut registry = MetricsRegistry::new();
    registry.register_build_info(server::VERSION)?;
    let transport = config.transport();

    match config.api {
        ApiMode::Rest => {
            let refresh_token =
                config
                    .refresh_token
                    .take()
                    .ok_or(ConfigError::MissingCredential {
                        field: "refresh token",
                        env: "SCP_REFRESHTOKEN",
                        api: ApiMode::Rest,
                    })?;
            let tokens = TokenSource::new(
                &config.token_url,
                config.client_id.as_str(),
                refresh_token,
                &transport,
            )?;
            let client = ScpClient::new(&config.api_url, Arc::new(tokens), &transport)?;
            registry.register(ScpCollector::new(client))?;
        }
        ApiMode::Soap => {
            let password = config
                .password
                .take()
                .ok_or(ConfigError::MissingCredential {
                    field: "password",
                    env: "SCP_PASSWORD",
                    api: ApiMode::Soap,
                })?;
            let login_name = config.login_name.clone().unwrap_or_default();
            let client = SoapClient::new(&config.soap_url, login_name, password, &transport)?;
            registry.register(LegacyCollector::new(client))?;
        }
    }

    Ok(registry)
}
