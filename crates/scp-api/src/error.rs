use thiserror::Error;

/// Top-level error type for the `scp-api` crate.
///
/// Covers every failure mode across both API surfaces: token exchange,
/// transport, the REST API and the legacy SOAP endpoint.
/// `scp-core` only logs these; no variant is fatal on its own.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token exchange rejected (revoked refresh token, wrong client id, ...).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Bearer token rejected by the API (HTTP 401).
    #[error("Access token rejected by the API")]
    Unauthorized,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── REST API ────────────────────────────────────────────────────
    /// Non-success status from the REST API.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── SOAP API ────────────────────────────────────────────────────
    /// `<soap:Fault>` returned by the legacy endpoint.
    #[error("SOAP fault: {message}")]
    SoapFault { message: String },

    /// Malformed XML in a SOAP response.
    #[error("Malformed XML response: {0}")]
    Xml(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Unauthorized)
    }

    /// Returns `true` if the upstream answered but without a usable payload.
    ///
    /// Distinguishes "API said no" from "we could not reach the API".
    pub fn is_missing_payload(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::SoapFault { .. } | Self::Deserialization { .. } | Self::Xml(_)
        )
    }

    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
