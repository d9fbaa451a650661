//! Adapters implementing the outbound ports.
//!
//! - `http.rs`: JSON-RPC over HTTP to the analytics backend
//! - `demo.rs`: canned backend for offline runs
//! - `sinks.rs`: memory, file and stdout render sinks

pub mod demo;
pub mod http;
pub mod sinks;

pub use demo::DemoTransport;
pub use http::HttpRpcTransport;
pub use sinks::{FileSink, MemorySink, StdoutSink};
