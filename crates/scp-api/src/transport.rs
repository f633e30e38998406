// Shared transport configuration for building reqwest::Client instances.
//
// The REST client, the SOAP client and the token source all build their
// HTTP clients through this module so timeout and user agent stay aligned.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("scp-exporter/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. The exporter does not retry, so this bounds
    /// each upstream round-trip of a scrape.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Transport)
    }
}
