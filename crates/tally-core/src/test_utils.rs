//! Test utilities for tally-core
//!
//! Provides a mock model provider that speaks both the Gemini
//! `generateContent` API and the OpenAI chat completions API, so the external
//! backends and their fallback paths can be exercised without network access.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock provider answers every request
#[derive(Debug, Clone, PartialEq)]
pub enum MockProviderMode {
    /// Answer successfully with this text
    Reply(String),
    /// Answer with this HTTP status and a provider-style error body
    Status(u16),
    /// Answer 200 but flag the generation as cut short
    MaxTokens,
    /// Answer 200 with a body that carries no text
    Malformed,
}

#[derive(Clone)]
struct ProviderState {
    mode: MockProviderMode,
    prompts: Arc<Mutex<Vec<String>>>,
}

/// Mock model provider for tests
pub struct MockProviderServer {
    addr: SocketAddr,
    prompts: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockProviderServer {
    /// Start the mock server on an available port
    pub async fn start(mode: MockProviderMode) -> Self {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            mode,
            prompts: prompts.clone(),
        };

        let app = Router::new()
            .route("/models/:call", post(handle_generate_content))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            prompts,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Prompts received so far, in arrival order
    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockProviderServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn error_response(code: u16) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({
        "error": {"code": code, "message": "mock provider failure", "status": "INTERNAL"}
    });
    (status, Json(body)).into_response()
}

/// Gemini `POST /models/{model}:generateContent`
async fn handle_generate_content(
    State(state): State<ProviderState>,
    Path(call): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    if !call.ends_with(":generateContent") {
        return error_response(404);
    }
    // The key belongs in the header, never in the URL
    let keyed_url = query.is_some_and(|q| q.contains("key="));
    if keyed_url || !headers.contains_key("x-goog-api-key") {
        return error_response(401);
    }

    let prompt = request
        .pointer("/contents/0/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    state.prompts.lock().unwrap().push(prompt);

    match &state.mode {
        MockProviderMode::Reply(text) => Json(json!({
            "candidates": [{
                "content": {"parts": [{"text": text}], "role": "model"},
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        MockProviderMode::Status(code) => error_response(*code),
        MockProviderMode::MaxTokens => Json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Your spending is"}], "role": "model"},
                "finishReason": "MAX_TOKENS"
            }]
        }))
        .into_response(),
        MockProviderMode::Malformed => Json(json!({
            "candidates": [{"content": {"role": "model"}, "finishReason": "STOP"}]
        }))
        .into_response(),
    }
}

/// OpenAI `POST /v1/chat/completions`
async fn handle_chat_completions(
    State(state): State<ProviderState>,
    Json(request): Json<Value>,
) -> Response {
    let prompt = request
        .pointer("/messages/0/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    state.prompts.lock().unwrap().push(prompt);

    match &state.mode {
        MockProviderMode::Reply(text) => Json(json!({
            "choices": [{"message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
        }))
        .into_response(),
        MockProviderMode::Status(code) => error_response(*code),
        MockProviderMode::MaxTokens => Json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Your spending is"}, "finish_reason": "length"}]
        }))
        .into_response(),
        MockProviderMode::Malformed => Json(json!({"choices": []})).into_response(),
    }
}
