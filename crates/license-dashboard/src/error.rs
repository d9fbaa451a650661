//! Error types for the dashboard client.
//!
//! `RemoteQueryError` is the only failure the query layer produces.
//! `DashboardError` covers configuration and load-cycle lifecycle.

use thiserror::Error;

use crate::domain::config::ConfigError;

/// Failure of a single remote analytics query.
#[derive(Debug, Clone, Error)]
pub enum RemoteQueryError {
    /// Endpoint name is not one of the recognized analytic operations
    #[error("unknown analytics endpoint: {0}")]
    UnknownEndpoint(String),

    /// Backend could not be reached
    #[error("connection failed: {0}")]
    Connection(String),

    /// Transport-level failure (request build, body read, TLS, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success HTTP status
    #[error("backend returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// Backend reported a JSON-RPC error
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    /// Response could not be decoded into the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Query did not complete within its timeout
    #[error("query {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },
}

impl RemoteQueryError {
    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteQueryError::UnknownEndpoint(_) => "unknown_endpoint",
            RemoteQueryError::Connection(_) => "connection",
            RemoteQueryError::Transport(_) => "transport",
            RemoteQueryError::HttpStatus { .. } => "http_status",
            RemoteQueryError::Rpc { .. } => "rpc",
            RemoteQueryError::Decode(_) => "decode",
            RemoteQueryError::Timeout { .. } => "timeout",
        }
    }
}

impl From<serde_json::Error> for RemoteQueryError {
    fn from(e: serde_json::Error) -> Self {
        RemoteQueryError::Decode(e.to_string())
    }
}

/// Result type for remote queries
pub type QueryResult<T> = Result<T, RemoteQueryError>;

/// Dashboard-level errors (configuration and lifecycle).
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A load cycle is already running on this dashboard
    #[error("a load cycle is already in flight")]
    LoadInProgress,

    /// The dashboard was torn down
    #[error("dashboard is no longer mounted")]
    Unmounted,
}

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
