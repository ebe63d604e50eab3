//! Ollama LLM adapter.
//!
//! Talks to a locally hosted Ollama server through its native chat API
//! (`/api/chat`, `/api/tags`). Uses browser `fetch()` via gloo-net for WASM
//! compatibility; the server must allow the page's origin (`OLLAMA_ORIGINS`).

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::{json, Value};

use localchat_core::ports::*;
use localchat_types::{
    ChatError, Result,
    config::BackendConfig,
    message::{Message, Role},
};

/// Provider that speaks the Ollama chat protocol
pub struct OllamaProvider {
    config: BackendConfig,
}

impl OllamaProvider {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.normalized_base_url())
    }

    pub fn tags_url(&self) -> String {
        format!("{}/api/tags", self.config.normalized_base_url())
    }
}

#[async_trait(?Send)]
impl InferencePort for OllamaProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = self.chat_url();
        let body = build_request_body(&req);
        log::debug!("POST {} ({} messages, model {})", url, req.messages.len(), req.model);

        let response = Request::post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .map_err(|e| ChatError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            log::warn!("Ollama returned HTTP {}", status);
            return Err(ChatError::Inference(http_error_message(status, &text)));
        }

        parse_chat_body(&text)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response = Request::get(&self.tags_url())
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Inference(http_error_message(status, &text)));
        }

        parse_model_list(&text)
    }
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct ApiChatResponse {
    message: Option<ApiMessage>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
    #[serde(default)]
    total_duration: Option<u64>,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ApiTags {
    #[serde(default)]
    models: Vec<ApiModel>,
}

#[derive(Deserialize)]
struct ApiModel {
    name: String,
}

// ─── Serialization helpers ───────────────────────────────────

/// JSON body for `POST /api/chat`. Messages serialize as-is; user
/// messages without images carry no `images` key.
pub fn build_request_body(req: &ChatRequest) -> Value {
    json!({
        "model": req.model,
        "messages": req.messages,
        "stream": req.stream,
    })
}

/// Decode a non-streaming `/api/chat` reply
pub fn parse_chat_body(text: &str) -> Result<ChatResponse> {
    let data: ApiChatResponse = serde_json::from_str(text)
        .map_err(|e| ChatError::Inference(format!("Malformed response: {}", e)))?;

    if let Some(error) = data.error {
        return Err(ChatError::Inference(error));
    }

    let api = data
        .message
        .ok_or_else(|| ChatError::Inference("No message in response".to_string()))?;

    let usage = match (data.prompt_eval_count, data.eval_count) {
        (None, None) => None,
        (prompt, completion) => Some(TokenUsage {
            prompt_tokens: prompt.unwrap_or(0),
            completion_tokens: completion.unwrap_or(0),
            total_duration_ns: data.total_duration.unwrap_or(0),
        }),
    };

    let message = Message {
        role: parse_role(&api.role),
        content: api.content,
        images: Vec::new(),
    };

    Ok(ChatResponse { message, usage })
}

fn parse_role(role: &str) -> Role {
    match role {
        "system" => Role::System,
        "user" => Role::User,
        _ => Role::Assistant,
    }
}

/// Decode `/api/tags` into model names
pub fn parse_model_list(text: &str) -> Result<Vec<String>> {
    let tags: ApiTags = serde_json::from_str(text)?;
    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

/// Ollama reports failures as `{"error": "..."}`; fall back to the raw body.
pub fn http_error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "unknown error".to_string()
            } else {
                trimmed.to_string()
            }
        });
    format!("HTTP {}: {}", status, detail)
}
