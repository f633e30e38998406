//! Shared configuration for the exporter.
//!
//! Settings are layered with figment: built-in defaults, then an optional
//! TOML file, then `SCP_`-prefixed environment variables. The binary merges
//! its command-line flags on top of [`figment`] before calling
//! [`Config::from_figment`].

mod web;

use std::collections::BTreeMap;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

use scp_api::{
    DEFAULT_API_URL, DEFAULT_CLIENT_ID, DEFAULT_SOAP_URL, DEFAULT_TOKEN_URL, TransportConfig,
};

pub use web::{TlsServerConfig, WebConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{field} is required for the {api} API (set {env})")]
    MissingCredential {
        field: &'static str,
        env: &'static str,
        api: ApiMode,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid web config {}: {source}", path.display())]
    WebConfig {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Which upstream API the exporter talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// OAuth2-authenticated JSON API.
    #[default]
    Rest,
    /// Legacy web service with login name and password.
    Soap,
}

impl std::fmt::Display for ApiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Rest => "rest",
            Self::Soap => "soap",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Logfmt,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// One of `debug`, `info`, `warn`, `error`.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

/// Fully layered exporter configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiMode,

    /// OAuth2 refresh token for the REST API.
    #[serde(default, skip_serializing, deserialize_with = "deserialize_secret")]
    pub refresh_token: Option<SecretString>,

    /// Customer login for the SOAP API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_name: Option<String>,

    /// Web service password for the SOAP API.
    #[serde(default, skip_serializing, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,

    pub api_url: String,
    pub token_url: String,
    pub client_id: String,
    pub soap_url: String,

    /// `host:port`; a bare `:port` binds every interface.
    pub listen_address: String,
    pub metrics_path: String,

    /// Optional YAML web config enabling TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<PathBuf>,

    /// Per-request upstream timeout.
    pub timeout_secs: u64,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiMode::default(),
            refresh_token: None,
            login_name: None,
            password: None,
            api_url: DEFAULT_API_URL.into(),
            token_url: DEFAULT_TOKEN_URL.into(),
            client_id: DEFAULT_CLIENT_ID.into(),
            soap_url: DEFAULT_SOAP_URL.into(),
            listen_address: ":9757".into(),
            metrics_path: "/metrics".into(),
            tls_config: None,
            timeout_secs: 30,
            log: LogConfig::default(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Environment names kept from earlier releases, mapped to config keys.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("refreshtoken", "refresh_token"),
    ("listenaddress", "listen_address"),
    ("tlsconfig", "tls_config"),
    ("loginname", "login_name"),
    ("log_level", "log.level"),
    ("log_format", "log.format"),
];

fn env_provider() -> Env {
    Env::prefixed("SCP_").map(|key| {
        let key = key.as_str();
        ENV_ALIASES
            .iter()
            .find(|(alias, _)| key.eq_ignore_ascii_case(alias))
            .map_or(key, |(_, field)| *field)
            .to_ascii_lowercase()
            .into()
    })
}

/// Keys taken from the environment verbatim. Figment parses env values by
/// shape, which would turn a numeric customer number into an integer and
/// strip leading zeros from a password.
const VERBATIM_KEYS: &[&str] = &["refresh_token", "login_name", "password"];

fn verbatim_env() -> Serialized<BTreeMap<String, String>> {
    let values = env_provider()
        .only(VERBATIM_KEYS)
        .iter()
        .map(|(key, value)| (key.as_str().to_owned(), value))
        .collect();
    Serialized::defaults(values)
}

/// Defaults, then `file` (if any), then the environment.
///
/// A missing file is not an error; figment treats it as empty.
pub fn figment(file: Option<&Path>) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
    if let Some(path) = file {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(env_provider().ignore(VERBATIM_KEYS))
        .merge(verbatim_env())
}

impl Config {
    /// Extract from an already layered figment and validate.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check credentials for the selected API and the shape of every
    /// setting the exporter needs at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api {
            ApiMode::Rest => {
                if !has_secret(self.refresh_token.as_ref()) {
                    return Err(ConfigError::MissingCredential {
                        field: "refresh token",
                        env: "SCP_REFRESHTOKEN",
                        api: self.api,
                    });
                }
                check_url("api_url", &self.api_url)?;
                check_url("token_url", &self.token_url)?;
                if self.client_id.is_empty() {
                    return Err(ConfigError::invalid("client_id", "must not be empty"));
                }
            }
            ApiMode::Soap => {
                if self.login_name.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::MissingCredential {
                        field: "login name",
                        env: "SCP_LOGINNAME",
                        api: self.api,
                    });
                }
                if !has_secret(self.password.as_ref()) {
                    return Err(ConfigError::MissingCredential {
                        field: "password",
                        env: "SCP_PASSWORD",
                        api: self.api,
                    });
                }
                check_url("soap_url", &self.soap_url)?;
            }
        }

        if !self.metrics_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "metrics_path",
                format!("{:?} must start with '/'", self.metrics_path),
            ));
        }
        if self.metrics_path == "/" {
            return Err(ConfigError::invalid(
                "metrics_path",
                "'/' is reserved for the landing page",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs", "must be positive"));
        }
        self.listen_addr()?;
        Ok(())
    }

    /// Resolve `listen_address`, treating `:port` as all interfaces.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.listen_address.trim();
        let candidate = if raw.starts_with(':') {
            format!("0.0.0.0{raw}")
        } else {
            raw.to_owned()
        };

        candidate
            .to_socket_addrs()
            .map_err(|e| ConfigError::invalid("listen_address", format!("{raw}: {e}")))?
            .next()
            .ok_or_else(|| ConfigError::invalid("listen_address", format!("{raw}: no address")))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Transport settings for the upstream clients.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(self.timeout())
    }

    /// Parse the web config file, if one is configured.
    pub fn web_config(&self) -> Result<Option<WebConfig>, ConfigError> {
        self.tls_config.as_deref().map(WebConfig::load).transpose()
    }
}

fn has_secret(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().trim().is_empty())
}

fn check_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| ConfigError::invalid(field, format!("{raw}: {e}")))
}
