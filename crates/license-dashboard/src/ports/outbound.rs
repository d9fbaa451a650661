//! Driven ports (outbound dependencies).
//!
//! - [`RpcTransport`]: delivers a query to the analytics backend
//! - [`RenderSink`]: receives rendered markup for a display slot

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::QueryRequest;
use crate::error::QueryResult;
use crate::render::Slot;

/// Transport to the analytics backend.
///
/// Implementations forward `args`/`kwargs` opaquely and return the raw
/// decoded `result` value. They never retry.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, request: &QueryRequest) -> QueryResult<Value>;
}

/// Write target for a display slot.
pub trait RenderSink: Send + Sync {
    /// Replace the content of `slot` with `markup`.
    fn write(&self, slot: Slot, markup: &str) -> std::io::Result<()>;
}

#[async_trait]
impl<T: RpcTransport + ?Sized> RpcTransport for std::sync::Arc<T> {
    async fn call(&self, request: &QueryRequest) -> QueryResult<Value> {
        (**self).call(request).await
    }
}
