//! Fake analytics backend.
//!
//! Serves `POST /web/dataset/call_kw/{model}/{method}` on an ephemeral port
//! and answers from a per-method reply table. Every call is recorded.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Scripted answer for one method.
#[derive(Debug, Clone)]
pub enum Reply {
    /// `{"result": value}`
    Result(Value),
    /// `{"error": {...}}` with the detail in `data.message`
    RpcError { code: i64, message: String, detail: String },
    /// Bare HTTP status, empty body
    Status(u16),
    /// Raw body sent as JSON content type
    Raw(String),
    /// `{"result": value}` after a delay
    Slow(Duration, Value),
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub method: String,
    pub body: Value,
}

#[derive(Default)]
struct BackendState {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Running fake backend. Shuts down on drop.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FakeBackend {
    /// Start with no replies configured.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/web/dataset/call_kw/:model/:method", post(call_kw))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown, stopped) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = stopped.await;
                })
                .await;
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown),
        }
    }

    /// Start with a healthy dataset for all six methods.
    pub async fn healthy() -> Self {
        let backend = Self::start().await;
        backend.reply(
            "get_license_statistics",
            Reply::Result(json!({"total": 120, "active": 90, "expired": 25, "expiring_soon": 5})),
        );
        backend.reply(
            "get_license_by_edition",
            Reply::Result(json!([
                {"edition": "community", "count": 70},
                {"edition": "enterprise", "count": 50}
            ])),
        );
        backend.reply(
            "get_license_trends",
            Reply::Result(json!([
                {"month": "2026-08", "label": "Aug 2026", "count": 9},
                {"month": "2026-09", "label": "Sep 2026", "count": 14}
            ])),
        );
        backend.reply(
            "get_license_by_client",
            Reply::Result(json!([
                {"name": "Acme", "code": "AC1", "count": 5},
                {"name": "Globex", "code": "GL2", "count": 3}
            ])),
        );
        backend.reply(
            "get_module_usage",
            Reply::Result(json!([
                {"module": "sale", "count": 80},
                {"module": "stock", "count": 41}
            ])),
        );
        backend.reply(
            "get_expiring_licenses",
            Reply::Result(json!([
                {"name": "LIC-0042", "client": "Acme", "expiry_date": "20/10/2026", "days_left": 1},
                {"name": "LIC-0043", "client": false, "expiry_date": "01/11/2026", "days_left": 13}
            ])),
        );
        backend
    }

    pub fn reply(&self, method: &str, reply: Reply) {
        self.state.replies.lock().insert(method.to_string(), reply);
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().clone()
    }

    pub fn methods_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    /// Positional args of the first call to `method`.
    pub fn args_of(&self, method: &str) -> Option<Value> {
        self.calls()
            .into_iter()
            .find(|c| c.method == method)
            .map(|c| c.body["params"]["args"].clone())
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn call_kw(
    State(state): State<Arc<BackendState>>,
    Path((model, method)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    state.calls.lock().push(RecordedCall {
        model,
        method: method.clone(),
        body: body.clone(),
    });
    let id = body.get("id").cloned().unwrap_or(Value::Null);
    let reply = state.replies.lock().get(&method).cloned();

    match reply {
        Some(Reply::Result(result)) => {
            Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
        }
        Some(Reply::Slow(delay, result)) => {
            tokio::time::sleep(delay).await;
            Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
        }
        Some(Reply::RpcError {
            code,
            message,
            detail,
        }) => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": code, "message": message, "data": {"message": detail}}
        }))
        .into_response(),
        Some(Reply::Status(status)) => StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(Reply::Raw(text)) => {
            ([(header::CONTENT_TYPE, "application/json")], text).into_response()
        }
        None => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {
                "code": 200,
                "message": "Odoo Server Error",
                "data": {"message": format!("method {method} does not exist")}
            }
        }))
        .into_response(),
    }
}
