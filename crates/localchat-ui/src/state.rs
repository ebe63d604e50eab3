//! UI-level state that drives rendering.
//! This is a read-only projection of the chat runtime,
//! updated each frame by draining the EventBus.

use localchat_core::runtime::TurnState;
use localchat_types::attachment::Attachment;
use localchat_types::event::ChatEvent;

/// State visible to UI panels
pub struct UiState {
    /// Finalized messages in the transcript
    pub messages: Vec<ChatEntry>,
    pub turn_status: TurnState,
    /// The on-screen message still being streamed
    pub streaming_text: String,
    pub input_text: String,
    /// Files dropped onto the window, sent with the next message
    pub pending_attachments: Vec<Attachment>,
    pub show_settings: bool,
    pub status_text: String,
    pub session_id: Option<String>,
    /// Models reported by the backend, for the settings picker
    pub available_models: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRole {
    User,
    Assistant,
}

/// A chat entry for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: EntryRole,
    pub content: String,
    /// Names of the files sent along with a user message
    pub attachment_names: Vec<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            turn_status: TurnState::Idle,
            streaming_text: String::new(),
            input_text: String::new(),
            pending_attachments: Vec::new(),
            show_settings: false,
            status_text: "Ready".to_string(),
            session_id: None,
            available_models: Vec::new(),
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::SessionStarted { session_id } => {
                    self.messages.clear();
                    self.streaming_text.clear();
                    self.turn_status = TurnState::Idle;
                    self.status_text = "Ready".to_string();
                    self.session_id = Some(session_id);
                }
                ChatEvent::TurnStart { .. } | ChatEvent::AwaitingModel => {
                    self.turn_status = TurnState::AwaitingModel;
                    self.status_text = "Thinking...".to_string();
                }
                ChatEvent::UserMessage {
                    text,
                    attachment_names,
                } => {
                    self.messages.push(ChatEntry {
                        role: EntryRole::User,
                        content: text,
                        attachment_names,
                    });
                }
                ChatEvent::Token { text } => {
                    self.streaming_text.push_str(&text);
                }
                ChatEvent::MessageSent => {
                    self.messages.push(ChatEntry {
                        role: EntryRole::Assistant,
                        content: std::mem::take(&mut self.streaming_text),
                        attachment_names: Vec::new(),
                    });
                }
                ChatEvent::TurnEnd { .. } => {
                    if !matches!(self.turn_status, TurnState::Error(_)) {
                        self.turn_status = TurnState::Idle;
                        self.status_text = "Ready".to_string();
                    }
                }
                ChatEvent::Error { message } => {
                    self.status_text = format!("Error: {}", message);
                    self.turn_status = TurnState::Error(message);
                }
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.turn_status, TurnState::AwaitingModel | TurnState::Streaming)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
