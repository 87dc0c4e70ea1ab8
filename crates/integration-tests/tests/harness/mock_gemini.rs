//! Mock Gemini backend for integration tests
//!
//! Serves `GET /v1/models` and `POST /v1/models/{model}:generateContent`
//! with canned bodies and records what it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Default roast returned by the mock
pub const MOCK_ROAST: &str = "That lighting is doing more work than you are.";

/// Mock Gemini backend
pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGeminiState>,
}

struct MockGeminiState {
    models_count: AtomicU32,
    generate_count: AtomicU32,
    models_response: (StatusCode, String),
    generate_response: (StatusCode, String),
    last_key: Mutex<Option<String>>,
    last_action: Mutex<Option<String>>,
    last_generate_body: Mutex<Option<Value>>,
}

/// Model list returned by default
pub fn default_models() -> Value {
    json!({
        "models": [
            {
                "name": "models/gemini-1.5-pro-002",
                "version": "002",
                "displayName": "Gemini 1.5 Pro 002",
                "supportedGenerationMethods": ["generateContent", "countTokens"]
            },
            {
                "name": "models/gemini-1.5-flash",
                "version": "001",
                "displayName": "Gemini 1.5 Flash",
                "inputTokenLimit": 1_000_000
            }
        ]
    })
}

/// A typical successful `generateContent` body
pub fn candidate_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 271, "candidatesTokenCount": 12, "totalTokenCount": 283 }
    })
}

impl MockGemini {
    /// Start with the default model list and roast
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(
            (StatusCode::OK, default_models().to_string()),
            (StatusCode::OK, candidate_response(&format!("  {MOCK_ROAST}\n")).to_string()),
        )
        .await
    }

    /// Start with a custom `generateContent` response
    pub async fn start_with_generate(status: StatusCode, body: &Value) -> anyhow::Result<Self> {
        Self::start_inner((StatusCode::OK, default_models().to_string()), (status, body.to_string())).await
    }

    /// Start with a custom model list response
    pub async fn start_with_models(status: StatusCode, body: &Value) -> anyhow::Result<Self> {
        let generate = candidate_response(MOCK_ROAST).to_string();
        Self::start_inner((status, body.to_string()), (StatusCode::OK, generate)).await
    }

    /// Start with the same raw (possibly non-JSON) body on both endpoints
    pub async fn start_with_raw(status: StatusCode, body: &str) -> anyhow::Result<Self> {
        Self::start_inner((status, body.to_owned()), (status, body.to_owned())).await
    }

    async fn start_inner(
        models_response: (StatusCode, String),
        generate_response: (StatusCode, String),
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockGeminiState {
            models_count: AtomicU32::new(0),
            generate_count: AtomicU32::new(0),
            models_response,
            generate_response,
            last_key: Mutex::new(None),
            last_action: Mutex::new(None),
            last_generate_body: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/models", routing::get(handle_models))
            .route("/v1/models/{action}", routing::post(handle_generate))
            .layer(DefaultBodyLimit::disable())
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the gateway, including `/v1`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn models_count(&self) -> u32 {
        self.state.models_count.load(Ordering::Relaxed)
    }

    pub fn generate_count(&self) -> u32 {
        self.state.generate_count.load(Ordering::Relaxed)
    }

    /// `key` query parameter of the most recent request
    pub fn last_key(&self) -> Option<String> {
        self.state.last_key.lock().unwrap().clone()
    }

    /// Path segment after `/v1/models/` of the last generation request
    pub fn last_action(&self) -> Option<String> {
        self.state.last_action.lock().unwrap().clone()
    }

    /// JSON body of the last generation request
    pub fn last_generate_body(&self) -> Option<Value> {
        self.state.last_generate_body.lock().unwrap().clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn canned((status, body): &(StatusCode, String)) -> Response {
    (*status, [(header::CONTENT_TYPE, "application/json")], body.clone()).into_response()
}

async fn handle_models(
    State(state): State<Arc<MockGeminiState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.models_count.fetch_add(1, Ordering::Relaxed);
    *state.last_key.lock().unwrap() = params.get("key").cloned();

    canned(&state.models_response)
}

async fn handle_generate(
    State(state): State<Arc<MockGeminiState>>,
    Path(action): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    state.generate_count.fetch_add(1, Ordering::Relaxed);
    *state.last_key.lock().unwrap() = params.get("key").cloned();
    *state.last_action.lock().unwrap() = Some(action);
    *state.last_generate_body.lock().unwrap() = serde_json::from_slice(&body).ok();

    canned(&state.generate_response)
}
