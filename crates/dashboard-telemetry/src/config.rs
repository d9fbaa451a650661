//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or a full EnvFilter directive)
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to use ANSI colors in pretty output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "license-dashboard".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LD_SERVICE_NAME`: Service name (default: license-dashboard)
    /// - `LD_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `LD_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `NO_COLOR`: Disable ANSI colors
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("LD_SERVICE_NAME")
                .unwrap_or_else(|| "license-dashboard".to_string()),

            log_level: lookup("LD_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs: lookup("LD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            ansi: lookup("NO_COLOR").is_none(),
        }
    }

    /// Override the log level (e.g. from a `--verbose` flag).
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
