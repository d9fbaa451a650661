//! # Dashboard Metrics
//!
//! Prometheus metrics for the query client and the load cycle.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! license-dashboard = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `dashboard_queries_total` - Counter of queries issued (by endpoint)
//! - `dashboard_query_failures_total` - Counter of failed queries (by endpoint, kind)
//! - `dashboard_query_duration_seconds` - Histogram of query latency (by endpoint)
//! - `dashboard_load_cycles_total` - Counter of finished load cycles (by outcome)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Queries issued, labeled by endpoint
    pub static ref QUERIES_ISSUED: IntCounterVec = register_int_counter_vec!(
        "dashboard_queries_total",
        "Total number of analytics queries issued",
        &["endpoint"]
    )
    .expect("Failed to create QUERIES_ISSUED metric");

    /// Failed queries, labeled by endpoint and error kind
    pub static ref QUERY_FAILURES: IntCounterVec = register_int_counter_vec!(
        "dashboard_query_failures_total",
        "Total number of failed analytics queries",
        &["endpoint", "kind"]
    )
    .expect("Failed to create QUERY_FAILURES metric");

    /// Query latency, labeled by endpoint
    pub static ref QUERY_DURATION: HistogramVec = register_histogram_vec!(
        "dashboard_query_duration_seconds",
        "Analytics query latency in seconds",
        &["endpoint"]
    )
    .expect("Failed to create QUERY_DURATION metric");

    /// Finished load cycles, labeled by outcome (ready / partial / failed)
    pub static ref LOAD_CYCLES: IntCounterVec = register_int_counter_vec!(
        "dashboard_load_cycles_total",
        "Total number of finished load cycles",
        &["outcome"]
    )
    .expect("Failed to create LOAD_CYCLES metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a query being issued
#[cfg(feature = "metrics")]
pub fn record_query_issued(endpoint: &str) {
    QUERIES_ISSUED.with_label_values(&[endpoint]).inc();
}

/// Record a query result with its latency
#[cfg(feature = "metrics")]
pub fn record_query_finished(endpoint: &str, elapsed_secs: f64, failure_kind: Option<&str>) {
    QUERY_DURATION
        .with_label_values(&[endpoint])
        .observe(elapsed_secs);
    if let Some(kind) = failure_kind {
        QUERY_FAILURES.with_label_values(&[endpoint, kind]).inc();
    }
}

/// Record a finished load cycle
#[cfg(feature = "metrics")]
pub fn record_load_cycle(outcome: &str) {
    LOAD_CYCLES.with_label_values(&[outcome]).inc();
}

/// Prometheus text exposition of the default registry
#[cfg(feature = "metrics")]
pub fn export_text() -> String {
    let mut buffer = Vec::new();
    if TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .is_err()
    {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_query_issued(_endpoint: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_query_finished(_endpoint: &str, _elapsed_secs: f64, _failure_kind: Option<&str>) {}

#[cfg(not(feature = "metrics"))]
pub fn record_load_cycle(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn export_text() -> String {
    String::new()
}
