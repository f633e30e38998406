// OAuth2 refresh-token source
//
// Exchanges the long-lived refresh token for short-lived access tokens at
// the identity provider's token endpoint. The access token is cached until
// shortly before it expires; callers just ask for a token per request and
// never see the refresh cycle.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Token endpoint of the control panel's identity provider.
pub const DEFAULT_TOKEN_URL: &str =
    "https://www.servercontrolpanel.de/realms/scp/protocol/openid-connect/token";

/// Public OAuth2 client registered for API access.
pub const DEFAULT_CLIENT_ID: &str = "scp";

/// Tokens are refreshed this long before their advertised expiry.
const EXPIRY_DELTA: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct AccessToken {
    value: SecretString,
    /// `None` means the provider did not advertise an expiry.
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at
            .is_none_or(|at| now + EXPIRY_DELTA < at)
    }
}

struct TokenState {
    refresh_token: SecretString,
    access: Option<AccessToken>,
}

/// Caching OAuth2 refresh-token source.
///
/// Concurrent callers serialize on the internal lock, so at most one
/// exchange is in flight at a time.
pub struct TokenSource {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    state: Mutex<TokenState>,
}

impl TokenSource {
    /// Build a token source with its own HTTP client.
    pub fn new(
        token_url: &str,
        client_id: impl Into<String>,
        refresh_token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            Url::parse(token_url)?,
            client_id,
            refresh_token,
        ))
    }

    /// Build a token source around an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        token_url: Url,
        client_id: impl Into<String>,
        refresh_token: SecretString,
    ) -> Self {
        Self {
            http,
            token_url,
            client_id: client_id.into(),
            state: Mutex::new(TokenState {
                refresh_token,
                access: None,
            }),
        }
    }

    /// Return a valid access token, exchanging the refresh token if needed.
    pub async fn access_token(&self) -> Result<SecretString, Error> {
        let mut state = self.state.lock().await;

        if let Some(ref token) = state.access {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        let response = self.exchange(&state.refresh_token).await?;

        // Identity providers may rotate the refresh token on every exchange.
        if let Some(rotated) = response.refresh_token {
            debug!("refresh token rotated");
            state.refresh_token = SecretString::from(rotated);
        }

        let value = SecretString::from(response.access_token);
        state.access = Some(AccessToken {
            value: value.clone(),
            expires_at: response
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        });

        Ok(value)
    }

    /// Drop the cached access token so the next call performs an exchange.
    pub async fn invalidate(&self) {
        self.state.lock().await.access = None;
    }

    async fn exchange(&self, refresh_token: &SecretString) -> Result<TokenResponse, Error> {
        debug!("POST {} (refresh_token grant)", self.token_url);

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("refresh_token", refresh_token.expose_secret()),
        ];

        let resp = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {desc}", err.error),
                    None => err.error,
                },
                Err(_) => format!("token endpoint returned HTTP {status}"),
            };
            return Err(Error::Authentication { message });
        }

        serde_json::from_str(&body).map_err(|e| Error::Authentication {
            message: format!("invalid token response: {e}"),
        })
    }
}
