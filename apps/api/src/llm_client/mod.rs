//! LLM Client: the single point of entry for all AI gateway calls.
//!
//! ARCHITECTURAL RULE: No other module may call the gateway directly.
//! Every call forces the model to invoke exactly one function whose parameters
//! are constrained by a JSON schema, so the answer is machine-parseable.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::Config;

pub mod prompts;
#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("AI gateway credential is not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Quota exhausted")]
    QuotaExhausted,

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("No structured tool call in response: {0}")]
    MissingToolCall(String),

    #[error("Tool arguments are not valid JSON: {0}")]
    MalformedArguments(String),
}

/// The function the model is forced to call.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema for the function parameters.
    pub parameters: Value,
}

/// Everything needed for one structured completion.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub tool: ToolSpec,
}

/// Seam between handlers and the model provider.
///
/// Carried in `AppState` as `Arc<dyn StructuredCompletion>`.
#[async_trait]
pub trait StructuredCompletion: Send + Sync {
    /// Returns the raw arguments object the model passed to `request.tool`.
    async fn complete(&self, request: &StructuredRequest) -> Result<Value, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    tools: [ToolDefinition<'a>; 1],
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionDefinition<'a>,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionName<'a>,
}

#[derive(Debug, Serialize)]
struct FunctionName<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Usually a JSON-encoded string; some providers send the object inline.
    pub arguments: Value,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single gateway client used by every service in the API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    url: String,
    model: String,
    rate_limit_retries: u32,
    retry_base: Duration,
}

impl LlmClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: config.ai_gateway_api_key.clone(),
            url: config.ai_gateway_url.clone(),
            model: config.ai_model.clone(),
            rate_limit_retries: config.ai_rate_limit_retries,
            retry_base: Duration::from_millis(config.ai_retry_base_ms),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl StructuredCompletion for LlmClient {
    /// Single-shot call, except that an upstream 429 is retried up to
    /// `rate_limit_retries` times with exponential backoff.
    async fn complete(&self, request: &StructuredRequest) -> Result<Value, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            tools: [ToolDefinition {
                kind: "function",
                function: FunctionDefinition {
                    name: request.tool.name,
                    description: request.tool.description,
                    parameters: &request.tool.parameters,
                },
            }],
            tool_choice: ToolChoice {
                kind: "function",
                function: FunctionName {
                    name: request.tool.name,
                },
            },
        };

        let mut attempt: u32 = 0;

        loop {
            let response = self
                .client
                .post(&self.url)
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status().as_u16();

            if status == 429 {
                if attempt < self.rate_limit_retries {
                    // Exponential backoff: base, 2*base, 4*base, ...
                    let delay = self.retry_base * 2u32.saturating_pow(attempt);
                    warn!(
                        "AI gateway rate limited (attempt {}), retrying after {}ms...",
                        attempt + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(LlmError::RateLimited { retries: attempt });
            }

            if status == 402 {
                return Err(LlmError::QuotaExhausted);
            }

            if !(200..300).contains(&status) {
                let text = response.text().await.unwrap_or_default();
                error!("AI gateway error: status={status} body={text}");
                return Err(LlmError::Api { status, body: text });
            }

            let chat: ChatResponse = response
                .json()
                .await
                .map_err(|e| LlmError::MissingToolCall(format!("undecodable response: {e}")))?;

            if let Some(usage) = &chat.usage {
                debug!(
                    "AI call succeeded: tool={} prompt_tokens={} completion_tokens={}",
                    request.tool.name, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return extract_tool_arguments(chat, request.tool.name);
        }
    }
}

/// Pulls the arguments of the forced function call out of a chat response.
fn extract_tool_arguments(chat: ChatResponse, expected_tool: &str) -> Result<Value, LlmError> {
    let call = chat
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.tool_calls)
        .and_then(|calls| calls.into_iter().next())
        .ok_or_else(|| LlmError::MissingToolCall("response contained no tool call".to_string()))?;

    if call.function.name != expected_tool {
        return Err(LlmError::MissingToolCall(format!(
            "model invoked '{}' instead of '{expected_tool}'",
            call.function.name
        )));
    }

    match call.function.arguments {
        Value::String(raw) => {
            serde_json::from_str(&raw).map_err(|e| LlmError::MalformedArguments(e.to_string()))
        }
        obj @ Value::Object(_) => Ok(obj),
        other => Err(LlmError::MalformedArguments(format!(
            "expected an object, got {other}"
        ))),
    }
}
