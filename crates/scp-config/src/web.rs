// Web config file: the YAML document that switches the listener to TLS.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;

/// Parsed web config. Only the TLS section is understood.
#[derive(Debug, Default, Deserialize)]
pub struct WebConfig {
    #[serde(default)]
    pub tls_server_config: Option<TlsServerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TlsServerConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

impl WebConfig {
    /// Read and parse `path`. Relative certificate paths are resolved
    /// against the directory containing the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let config = Self::parse(&raw, base).map_err(|source| ConfigError::WebConfig {
            path: path.to_path_buf(),
            source,
        })?;
        config.checked()
    }

    fn parse(raw: &str, base: &Path) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit; treat it as no settings.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(raw)?;
        if let Some(ref mut tls) = config.tls_server_config {
            tls.cert_file = resolve(base, &tls.cert_file);
            tls.key_file = resolve(base, &tls.key_file);
        }
        Ok(config)
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if let Some(ref tls) = self.tls_server_config {
            if tls.cert_file.as_os_str().is_empty() {
                return Err(ConfigError::invalid("cert_file", "must not be empty"));
            }
            if tls.key_file.as_os_str().is_empty() {
                return Err(ConfigError::invalid("key_file", "must not be empty"));
            }
        }
        Ok(self)
    }

    /// Certificate and key paths when TLS is configured.
    pub fn tls(&self) -> Option<&TlsServerConfig> {
        self.tls_server_config.as_ref()
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() || path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
