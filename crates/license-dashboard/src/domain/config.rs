//! Dashboard configuration with validation.
//!
//! Loaded from TOML, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LD_BACKEND_URL` | `backend.base_url` |
//! | `LD_BACKEND_MODEL` | `backend.model` |
//! | `LD_QUERY_TIMEOUT` | `load.query_timeout` (humantime, e.g. `15s`) |

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::endpoints::Endpoint;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("invalid query parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

/// Main dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Analytics backend connection
    pub backend: BackendConfig,
    /// Fixed parameters of the secondary queries
    pub queries: QueryParams,
    /// Load cycle behaviour
    pub load: LoadConfig,
}

impl DashboardConfig {
    /// Parse a TOML document. Missing sections keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a TOML file, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LD_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LD_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(model) = lookup("LD_BACKEND_MODEL") {
            self.backend.model = model;
        }
        if let Some(raw) = lookup("LD_QUERY_TIMEOUT") {
            let timeout = humantime_serde::re::humantime::parse_duration(&raw)
                .map_err(|e| ConfigError::InvalidTimeout(format!("LD_QUERY_TIMEOUT={raw}: {e}")))?;
            self.load.query_timeout = Some(timeout);
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.backend.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.backend.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "unsupported scheme {}",
                url.scheme()
            )));
        }

        if self.backend.model.trim().is_empty() {
            return Err(ConfigError::InvalidParameter("backend.model cannot be empty".into()));
        }

        if self.queries.trends_months == 0 {
            return Err(ConfigError::InvalidParameter(
                "trends_months cannot be 0".into(),
            ));
        }
        if self.queries.top_clients_limit == 0 {
            return Err(ConfigError::InvalidParameter(
                "top_clients_limit cannot be 0".into(),
            ));
        }
        if self.queries.expiring_horizon_days == 0 {
            return Err(ConfigError::InvalidParameter(
                "expiring_horizon_days cannot be 0".into(),
            ));
        }

        if self.backend.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "connect_timeout cannot be 0".into(),
            ));
        }
        if self.load.query_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidTimeout(
                "query_timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend (default: http://127.0.0.1:8069)
    pub base_url: String,
    /// Model exposing the analytic methods
    pub model: String,
    /// TCP connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8069".to_string(),
            model: "license.analytics".to_string(),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

/// Fixed arguments of the secondary queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Months of history for `get_license_trends`
    pub trends_months: u32,
    /// Number of clients for `get_license_by_client`
    pub top_clients_limit: u32,
    /// Horizon in days for `get_expiring_licenses`
    pub expiring_horizon_days: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            trends_months: 12,
            top_clients_limit: 10,
            expiring_horizon_days: 30,
        }
    }
}

/// How the secondary queries are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryDispatch {
    /// One query at a time, in load order
    #[default]
    Sequential,
    /// All five at once; each section renders as its result arrives
    Concurrent,
}

/// Load cycle configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Global per-query timeout; `None` uses the endpoint registry values
    #[serde(with = "humantime_serde")]
    pub query_timeout: Option<Duration>,
    /// Secondary query dispatch
    pub secondary_dispatch: SecondaryDispatch,
}

impl LoadConfig {
    /// Effective timeout for an endpoint.
    ///
    /// `query_timeout` overrides the registry default.
    pub fn timeout_for(&self, endpoint: Endpoint) -> Duration {
        self.query_timeout.unwrap_or_else(|| endpoint.info().timeout)
    }
}
