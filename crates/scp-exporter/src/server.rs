// ── HTTP surface ──
//
// Landing page on `/`, the exposition on the metrics path, 404 elsewhere.
// Served by axum-server so the same router runs over plain TCP or rustls.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use quick_xml::escape::escape;
use tracing::{error, info};

use scp_config::TlsServerConfig;
use scp_core::MetricsRegistry;

use crate::error::ExporterError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const NAME: &str = "Netcup SCP Exporter";
const DESCRIPTION: &str = "Exporting Metrics from Netcup's ServerControlPanel";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Clone)]
struct AppState {
    registry: Arc<MetricsRegistry>,
    landing: Arc<str>,
}

/// Build the router. `metrics_path` must start with `/` and not be `/`.
pub fn router(registry: Arc<MetricsRegistry>, metrics_path: &str) -> Router {
    let state = AppState {
        registry,
        landing: landing_page(metrics_path).into(),
    };

    Router::new()
        .route("/", get(landing))
        .route(metrics_path, get(metrics))
        .with_state(state)
}

async fn landing(State(state): State<AppState>) -> Html<String> {
    Html(state.landing.to_string())
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.registry.render().await {
        Ok(body) => (
            [(
                header::CONTENT_TYPE,
                format!("{}; charset=utf-8", MetricsRegistry::content_type()),
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "unable to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

fn landing_page(metrics_path: &str) -> String {
    let href = escape(metrics_path);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"UTF-8\"><title>{NAME}</title></head>\n\
         <body>\n\
         <h1>{NAME}</h1>\n\
         <p>{DESCRIPTION}</p>\n\
         <p>Version: {VERSION}</p>\n\
         <ul><li><a href=\"{href}\">Metrics</a></li></ul>\n\
         </body>\n\
         </html>\n"
    )
}

// ── Listener ───────────────────────────────────────────────────────

/// Serve until SIGINT or SIGTERM, then drain in-flight scrapes.
pub async fn serve(
    addr: SocketAddr,
    app: Router,
    tls: Option<&TlsServerConfig>,
) -> Result<(), ExporterError> {
    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));
    let service = app.into_make_service();

    let result = if let Some(tls) = tls {
        let config = RustlsConfig::from_pem_file(&tls.cert_file, &tls.key_file)
            .await
            .map_err(|source| ExporterError::Tls {
                cert: tls.cert_file.clone(),
                key: tls.key_file.clone(),
                source,
            })?;
        info!(%addr, "listening (https)");
        axum_server::bind_rustls(addr, config)
            .handle(handle)
            .serve(service)
            .await
    } else {
        info!(%addr, "listening (http)");
        axum_server::bind(addr).handle(handle).serve(service).await
    };

    result.map_err(|source| ExporterError::Serve { addr, source })?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
