//! Domain types for the dashboard client.
//!
//! Entities, endpoint registry, configuration, view state and the load
//! cycle state machine. No I/O lives here.

pub mod config;
pub mod endpoints;
pub mod lifecycle;
pub mod types;
pub mod view_state;

// Re-exports for convenience
pub use config::{
    BackendConfig, ConfigError, DashboardConfig, LoadConfig, QueryParams, SecondaryDispatch,
};
pub use endpoints::{is_endpoint_supported, Endpoint, EndpointInfo};
pub use lifecycle::{LoadEvent, LoadLifecycle, LoadPhase};
pub use types::*;
pub use view_state::ViewState;
