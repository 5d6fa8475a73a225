//! Helpers shared by the HTTP contract tests: router construction and a fake
//! Gemini endpoint that records every request it receives.

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri};
use axum::{Json, Router};
use domain::random::RandomSource;
use infrastructure::catalog_loader::load_catalog;
use infrastructure::config::Config;
use presentation::api::{router, AppState};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-key";

/// Router over the embedded catalog with the given config and randomness.
pub fn app(config: &Config, random: impl RandomSource + 'static) -> Router {
    let catalog = load_catalog(None).expect("embedded catalog");
    router(Arc::new(AppState::new(config, catalog, Arc::new(random))))
}

/// Config whose Gemini calls go to `base_url` with [`TEST_API_KEY`].
pub fn config_with_upstream(base_url: &str) -> Config {
    Config {
        gemini_api_key: Some(TEST_API_KEY.to_string()),
        gemini_base_url: base_url.to_string(),
        ..Config::default()
    }
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Gemini-shaped success body carrying `text` as the first candidate.
pub fn candidate_body(text: &str) -> Value {
    json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}
        ]
    })
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Stand-in for the Gemini API on an ephemeral local port.
pub struct FakeGemini {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeGemini {
    pub async fn start(status: StatusCode, reply: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            status,
            reply,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(record).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub async fn replying_text(text: &str) -> Self {
        Self::start(StatusCode::OK, candidate_body(text)).await
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(State(state): State<FakeState>, uri: Uri, body: Bytes) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    (state.status, Json(state.reply.clone()))
}
