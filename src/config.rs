//! Client configuration: registry endpoints, credentials, timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

const ENV_REGISTRY_URL: &str = "KP_REGISTRY_URL";
const ENV_MCP_URL: &str = "KP_MCP_URL";
const ENV_API_KEY: &str = "KP_API_KEY";
const ENV_TIMEOUT_MS: &str = "KP_TIMEOUT_MS";

/// Errors loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file could not be parsed as TOML.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A configured URL is not parseable.
    #[error("Invalid {field} URL: {value}")]
    InvalidUrl {
        /// Which field held the bad URL.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Configuration for the registry client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KpConfig {
    /// Base URL of the registry REST API.
    pub registry_url: String,
    /// URL of the MCP JSON-RPC endpoint.
    pub mcp_url: String,
    /// Bearer token sent as `Authorization` on REST calls.
    pub api_key: Option<String>,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

fn default_registry_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_mcp_url() -> String {
    "http://localhost:3001/mcp".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for KpConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            mcp_url: default_mcp_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl KpConfig {
    /// Build configuration from `KP_*` environment variables over defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a TOML file. Missing fields fall back to
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] when the file
    /// is unreadable or not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file location
    /// (`<user config dir>/knowledgepulse/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("knowledgepulse").join("config.toml"))
    }

    /// Resolve configuration: config file when present, then environment
    /// variable overrides on top.
    #[must_use]
    pub fn discover() -> Self {
        let base = Self::default_path()
            .filter(|path| path.exists())
            .and_then(|path| match Self::load(&path) {
                Ok(config) => Some(config),
                Err(err) => {
                    tracing::warn!(error = %err, "Ignoring unreadable config file");
                    None
                }
            })
            .unwrap_or_default();
        base.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(ENV_REGISTRY_URL) {
            self.registry_url = value;
        }
        if let Ok(value) = std::env::var(ENV_MCP_URL) {
            self.mcp_url = value;
        }
        if let Ok(value) = std::env::var(ENV_API_KEY) {
            if !value.is_empty() {
                self.api_key = Some(value);
            }
        }
        if let Ok(value) = std::env::var(ENV_TIMEOUT_MS) {
            if let Ok(ms) = value.parse() {
                self.timeout_ms = ms;
            }
        }
        self
    }

    /// Check that both endpoint URLs parse.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.registry_url).map_err(|_| ConfigError::InvalidUrl {
            field: "registry",
            value: self.registry_url.clone(),
        })?;
        Url::parse(&self.mcp_url).map_err(|_| ConfigError::InvalidUrl {
            field: "mcp",
            value: self.mcp_url.clone(),
        })?;
        Ok(())
    }

    /// Per-call timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
