//! Conversation session — the ordered message log of one chat.

use localchat_types::{
    ChatError, Result,
    message::Message,
    session::{SessionId, SessionState},
};

/// One user's isolated conversation.
///
/// `history[0]` is always the system seed. Every other entry is added at
/// the end through the `append_*` methods and never changes afterwards.
/// History grows for the life of the session and is resent in full on
/// every turn.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: SessionId,
    history: Vec<Message>,
    state: SessionState,
}

impl ConversationSession {
    /// Start a session seeded with the persona as its system message.
    pub fn init(persona: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            history: vec![Message::system(persona)],
            state: SessionState::Active,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Append a user message. An empty `images` list leaves the message
    /// without an image field.
    pub fn append_user_message(
        &mut self,
        text: impl Into<String>,
        images: Vec<String>,
    ) -> Result<()> {
        self.ensure_active()?;
        self.history.push(Message::user_with_images(text, images));
        Ok(())
    }

    pub fn append_assistant_message(&mut self, text: impl Into<String>) -> Result<()> {
        self.ensure_active()?;
        self.history.push(Message::assistant(text));
        Ok(())
    }

    /// The exact sequence to submit to the inference backend.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Never true for an active session; the seed is always there.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Tear the session down. History is discarded.
    pub fn close(&mut self) {
        if self.is_active() {
            log::info!("Closing session {} after {} messages", self.id, self.history.len());
        }
        self.state = SessionState::Closed;
        self.history.clear();
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Closed => Err(ChatError::SessionClosed(self.id.to_string())),
        }
    }
}
