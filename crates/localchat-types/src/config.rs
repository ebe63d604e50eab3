use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "granite3.2-vision";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant with vision capabilities. You can see and understand images.";

/// Top-level front-end configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub backend: BackendConfig,
    /// Persona seeded as the system message of every new session
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ChatConfig {
    /// Greeting streamed to the user when a chat starts
    pub fn greeting(&self) -> String {
        format!(
            "Hello, I'm your 100% local alternative to ChatGPT running on {}. How can I help you today?",
            self.backend.model
        )
    }
}

/// Where the local inference server lives and which model it should run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl BackendConfig {
    /// Base URL with any trailing slashes removed
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
