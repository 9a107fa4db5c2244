//! Test doubles for the AI gateway: a real local HTTP server with scripted
//! responses, and an in-process `StructuredCompletion` stub.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::llm_client::{LlmError, StructuredCompletion, StructuredRequest};

/// Builds a chat-completion body whose first choice calls `name` with `args`.
pub fn tool_call_response(name: &str, args: Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": name, "arguments": args.to_string() }
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200 }
    })
}

#[derive(Default)]
struct GatewayState {
    responses: Mutex<VecDeque<(u16, Value)>>,
    hits: AtomicUsize,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
}

/// A scripted OpenAI-compatible gateway bound to an ephemeral local port.
/// Responses are served in order; the last one repeats.
pub struct FakeGateway {
    pub url: String,
    state: Arc<GatewayState>,
}

impl FakeGateway {
    pub async fn start(status: u16, body: Value) -> Self {
        Self::with_responses(vec![(status, body)]).await
    }

    pub async fn with_responses(responses: Vec<(u16, Value)>) -> Self {
        let state = Arc::new(GatewayState {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_completion))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/v1/chat/completions"),
            state,
        }
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

async fn handle_completion(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(body);
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (status, response) = {
        let mut queue = state.responses.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or((500, json!({"error": "no script"})))
        }
    };

    (StatusCode::from_u16(status).unwrap(), Json(response))
}

/// In-process completion stub. Routes on the forced tool name and, for
/// recruiter calls, on a marker string inside the user prompt.
pub struct StubCompletion {
    handler: Box<dyn Fn(&StructuredRequest) -> Result<Value, LlmError> + Send + Sync>,
    calls: AtomicUsize,
}

impl StubCompletion {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&StructuredRequest) -> Result<Value, LlmError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructuredCompletion for StubCompletion {
    async fn complete(&self, request: &StructuredRequest) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.handler)(request)
    }
}

/// A schema-valid recruiter result with the given sub-scores.
pub fn recruiter_args(final_score: u8, subs: [u8; 4]) -> Value {
    json!({
        "final_score": final_score,
        "lexical_score": subs[0],
        "semantic_score": subs[1],
        "project_depth": subs[2],
        "experience_score": subs[3],
        "matched_skills": ["Rust", "Tokio"],
        "missing_skills": ["Kubernetes"],
        "summary": "Solid systems background."
    })
}

/// A schema-valid score-mode result.
pub fn score_args() -> Value {
    json!({
        "final_score": 78,
        "percentile_rank": 82.5,
        "percentile_label": "Top 18%",
        "confidence_label": "HIGH",
        "breakdown": {
            "lexical_score": 80,
            "semantic_score": 76,
            "project_depth": 71,
            "experience_score": 64
        },
        "matched_skills": ["Python", "React"],
        "missing_skills": ["System Design"],
        "best_fit_roles": [{"role": "Backend Engineer", "match": 84, "type": "fulltime"}],
        "roadmap": [{"task": "Build a distributed KV store", "time": "3 weeks", "priority": "high"}],
        "integrity_flags": [{"label": "No keyword stuffing", "status": "pass"}]
    })
}

/// A schema-valid dream-role result.
pub fn dream_role_args() -> Value {
    json!({
        "readiness": 62,
        "gaps": [{"skill": "System Design", "importance": "critical", "current": 20}],
        "strengths": ["Python", "Docker"],
        "roadmap": [{
            "week": "Week 1-2",
            "task": "Complete System Design primer",
            "difficulty": "Hard",
            "time_estimate": "10h",
            "resource_url": "https://example.com/primer"
        }]
    })
}
