//! License Dashboard - read-only analytics client for license statistics.
//!
//! Fetches precomputed statistics from an analytics backend over JSON-RPC
//! and renders them into named display slots.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        DashboardService                           │
//! │                                                                   │
//! │  Phase 1 (critical)          Phase 2 (best effort)                │
//! │  get_license_statistics ──→  editions, trends, top clients,       │
//! │        │                     top modules, expiring licenses       │
//! │        ▼                            │                             │
//! │    ViewState                        ▼                             │
//! │        │                      section renderers                   │
//! │        └──────────┬─────────────────┘                             │
//! │                   ▼                                               │
//! │             OutputTargets (slot → RenderSink)                     │
//! └───────────────────┬───────────────────────────────────────────────┘
//!                     │ QueryClient (endpoint check, timeout)
//!                     ▼
//!               RpcTransport
//!        ┌────────────┴────────────┐
//!   HttpRpcTransport          DemoTransport
//!   (call_kw JSON-RPC)        (canned data)
//! ```
//!
//! # Load Cycle
//!
//! `Idle → LoadingCritical → LoadingSecondary → Ready`, with `Failed`
//! reachable only from `LoadingCritical`. A failed summary query aborts the
//! cycle before any secondary query is issued; a failed secondary query only
//! affects its own section.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use license_dashboard::{DashboardConfig, DashboardService, HttpRpcTransport, MemorySink, OutputTargets};
//!
//! let config = DashboardConfig::load("dashboard.toml")?;
//! let transport = HttpRpcTransport::new(&config.backend)?;
//! let sink = Arc::new(MemorySink::new());
//! let dashboard = DashboardService::new(config, transport, OutputTargets::new().bind_all(sink))?;
//! let outcome = dashboard.load().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod client;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod render;
pub mod service;

// Re-exports
pub use adapters::{DemoTransport, FileSink, HttpRpcTransport, MemorySink, StdoutSink};
pub use client::QueryClient;
pub use domain::{
    BackendConfig, ClientUsage, ConfigError, DashboardConfig, EditionBreakdown, EditionCount,
    Endpoint, EndpointInfo, ExpiringLicense, LoadConfig, LoadPhase, ModuleUsage, QueryParams,
    QueryRequest, SecondaryDispatch, SummaryStats, TrendPoint, ViewState,
};
pub use error::{DashboardError, DashboardResult, QueryResult, RemoteQueryError};
pub use ports::{RenderSink, RpcTransport};
pub use render::{OutputTargets, Slot};
pub use service::{
    DashboardService, LoadOutcome, LoadReport, MountHandle, Section, SectionData, SectionReport,
    SectionStatus,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
