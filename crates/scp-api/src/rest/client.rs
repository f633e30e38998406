// Async HTTP client for the Server Control Panel REST API.
//
// Base path: /scp-core/api/
// Auth: OAuth2 bearer token from a refresh-token grant

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types;
use crate::auth::TokenSource;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://www.servercontrolpanel.de/scp-core";

// ── Error response shape from the REST API ───────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the REST API.
///
/// Every request carries a bearer token obtained from the shared
/// [`TokenSource`]. A 401 drops the cached token so the next request
/// performs a fresh exchange.
#[derive(Clone)]
pub struct ScpClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Option<Arc<TokenSource>>,
}

impl ScpClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build an authenticated client.
    pub fn new(
        base_url: &str,
        tokens: Arc<TokenSource>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            tokens: Some(tokens),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            tokens: None,
        })
    }

    /// Ensure the base path ends in `/` so relative joins append to it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/v1/servers"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let request = match self.tokens {
            Some(ref tokens) => {
                let token = tokens.access_token().await?;
                request.bearer_auth(token.expose_secret())
            }
            None => request,
        };

        let resp = request.send().await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            if let Some(ref tokens) = self.tokens {
                tokens.invalidate().await;
            }
            return Err(Error::Unauthorized);
        }

        Ok(resp)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(params)).await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                message: Some(message),
                code: Some(code),
            }) => format!("{code}: {message}"),
            Ok(ErrorResponse {
                message: Some(message),
                code: None,
            }) => message,
            _ if raw.is_empty() => status.to_string(),
            _ => raw,
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Liveness probe. Only an exact `200 OK` counts as up.
    pub async fn ping(&self) -> Result<(), Error> {
        let url = self.url("api/ping")?;
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        let status = resp.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Next scheduled maintenance window.
    pub async fn maintenance(&self) -> Result<types::MaintenanceInfo, Error> {
        self.get("api/v1/maintenance").await
    }

    /// All servers visible to the account.
    pub async fn list_servers(&self) -> Result<Vec<types::ServerListMinimal>, Error> {
        self.get("api/v1/servers").await
    }

    /// Full detail for one server, including hypervisor live info.
    pub async fn get_server(&self, id: i64) -> Result<types::Server, Error> {
        self.get_with_params(
            &format!("api/v1/servers/{id}"),
            &[("loadServerLiveInfo", "true")],
        )
        .await
    }

    /// Background tasks for the account.
    pub async fn list_tasks(&self) -> Result<Vec<types::TaskInfo>, Error> {
        self.get("api/v1/tasks").await
    }
}
