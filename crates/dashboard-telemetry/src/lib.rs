//! # Dashboard Telemetry
//!
//! Logging setup shared by the dashboard binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dashboard_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LD_SERVICE_NAME` | `license-dashboard` | Service name in log events |
//! | `LD_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `LD_JSON_LOGS` | `false` | JSON output (default true in containers) |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::build_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Initialize logging.
///
/// Returns a guard to hold for the lifetime of the application; dropping it
/// logs the shutdown.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
