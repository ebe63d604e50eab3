//! Port traits — the hexagonal architecture boundary.
//!
//! The inference backend and the display surface are both external.
//! Implementations live in `localchat-platform` and `localchat-app`;
//! the core only depends on these traits.

use async_trait::async_trait;
use localchat_types::{Result, message::Message};

// ─── Inference Port ──────────────────────────────────────────

/// Request sent to the inference backend
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    /// Full conversation history, system seed first
    pub messages: Vec<Message>,
    pub stream: bool,
}

/// Complete (non-incremental) reply from the backend
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    /// Wall time reported by the backend, in nanoseconds
    pub total_duration_ns: u64,
}

#[async_trait(?Send)]
pub trait InferencePort {
    /// Send the full history and wait for one assistant message
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// Models installed on the backend
    async fn list_models(&self) -> Result<Vec<String>>;
}

// ─── Display Port ────────────────────────────────────────────

/// The on-screen message primitive of the UI surface.
///
/// A message grows one unit at a time through `stream_token` and is
/// moved to the transcript by `send`.
#[async_trait(?Send)]
pub trait DisplayPort {
    async fn stream_token(&self, token: &str) -> Result<()>;

    async fn send(&self) -> Result<()>;

    /// Show a complete message in one go
    async fn post(&self, text: &str) -> Result<()> {
        self.stream_token(text).await?;
        self.send().await
    }
}
