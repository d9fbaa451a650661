//! JSON-RPC transport to an Odoo-style backend.
//!
//! Each query is a `call_kw` request:
//!
//! ```text
//! POST {base_url}/web/dataset/call_kw/{model}/{method}
//! {"jsonrpc":"2.0","method":"call","params":{"model":..,"method":..,"args":[..],"kwargs":{..}},"id":N}
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::{BackendConfig, QueryRequest};
use crate::error::{QueryResult, RemoteQueryError};
use crate::ports::RpcTransport;

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: CallKwParams<'a>,
    pub id: u64,
}

/// `call_kw` parameters
#[derive(Debug, Serialize)]
pub struct CallKwParams<'a> {
    pub model: &'a str,
    pub method: &'a str,
    pub args: &'a [Value],
    pub kwargs: &'a Map<String, Value>,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    /// `Some(Value::Null)` for an explicit `"result": null`, `None` when absent
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Odoo puts the useful text in `data.message`.
    fn detail(&self) -> String {
        match self
            .data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
        {
            Some(detail) if !detail.is_empty() => format!("{}: {}", self.message, detail),
            _ => self.message.clone(),
        }
    }
}

/// HTTP transport.
pub struct HttpRpcTransport {
    client: Client,
    base_url: String,
    model: String,
    request_id: AtomicU64,
}

impl HttpRpcTransport {
    /// Create a transport for the configured backend.
    ///
    /// No overall request timeout is set here: the query client bounds each
    /// call with its endpoint timeout.
    pub fn new(config: &BackendConfig) -> QueryResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| RemoteQueryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            request_id: AtomicU64::new(1),
        })
    }

    /// Get the next request ID.
    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// URL of a `call_kw` endpoint.
    pub fn url_for(&self, method: &str) -> String {
        format!(
            "{}/web/dataset/call_kw/{}/{}",
            self.base_url, self.model, method
        )
    }
}

#[async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn call(&self, request: &QueryRequest) -> QueryResult<Value> {
        let method = request.endpoint.name();
        let url = self.url_for(method);
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "call",
            params: CallKwParams {
                model: &self.model,
                method,
                args: &request.args,
                kwargs: &request.kwargs,
            },
            id: self.next_id(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RemoteQueryError::Connection(format!("Cannot connect to {}", self.base_url))
                } else {
                    RemoteQueryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteQueryError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteQueryError::Transport(e.to_string()))?;
        let rpc_response: JsonRpcResponse = serde_json::from_slice(&bytes)?;

        if let Some(error) = rpc_response.error {
            return Err(RemoteQueryError::Rpc {
                code: error.code,
                message: error.detail(),
                data: error.data,
            });
        }

        rpc_response.result.ok_or_else(|| {
            RemoteQueryError::Decode(format!("{method}: response has neither result nor error"))
        })
    }
}
