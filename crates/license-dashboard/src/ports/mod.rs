//! Ports for the dashboard client.

pub mod outbound;

pub use outbound::{RenderSink, RpcTransport};
