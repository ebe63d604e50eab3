use serde::{Deserialize, Serialize};

/// Events emitted by the chat runtime.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A new session was seeded
    SessionStarted { session_id: String },

    /// The runtime started handling a user message
    TurnStart { turn_id: u64 },

    /// The user message this turn answers, shown once its turn begins
    UserMessage {
        text: String,
        attachment_names: Vec<String>,
    },

    /// Waiting on the inference backend
    AwaitingModel,

    /// One output unit appended to the on-screen message
    Token { text: String },

    /// The on-screen message is finished and moves to the transcript
    MessageSent,

    /// The runtime finished the current turn
    TurnEnd { turn_id: u64 },

    /// An error occurred
    Error { message: String },
}
