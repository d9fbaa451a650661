//! Structured logging helpers.
//!
//! Events carry consistent fields so log shippers can index them:
//! - `component`: emitting component (query_client, aggregator, ...)
//! - `endpoint`: remote analytic method, for query events
//! - `phase`: load cycle phase, for cycle events

/// Log a query-related event with standard fields.
#[macro_export]
macro_rules! log_query_event {
    ($level:ident, $endpoint:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "query_client",
            endpoint = %$endpoint,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a load-cycle event with standard fields.
#[macro_export]
macro_rules! log_cycle_event {
    ($level:ident, $phase:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "aggregator",
            phase = %$phase,
            $($($field)*,)?
            $msg
        )
    };
}
