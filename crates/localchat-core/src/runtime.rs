//! Chat runtime — drives one session through its turns.
//!
//! A turn is strictly sequential:
//! 1. Append the user message (with any image references)
//! 2. Send the full history to the inference backend and wait
//! 3. Append the assistant reply
//! 4. Stream the reply to the display one character at a time, then finalize
//!
//! Backend failures never end the session. The user message stays in the
//! history, no assistant message is appended, and the error text is shown
//! in place of a reply.

use localchat_types::{
    Result,
    attachment::{Attachment, image_refs},
    config::ChatConfig,
    event::ChatEvent,
    message::Message,
};
use crate::event_bus::EventBus;
use crate::ports::*;
use crate::session::ConversationSession;

const START_FAILED_TEXT: &str = "There was an error starting the chat. Please try again.";

/// Result of processing one user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The backend answered; the reply is in the history
    Reply(String),
    /// The backend call failed; carries the text shown to the user
    Failed(String),
}

impl TurnOutcome {
    /// Text relayed to the display for this turn
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Reply(text) | TurnOutcome::Failed(text) => text,
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self, TurnOutcome::Reply(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingModel,
    Streaming,
    Error(String),
}

/// Owns the active session and the configuration it was started with
pub struct ChatRuntime {
    pub config: ChatConfig,
    pub event_bus: EventBus,
    pub state: TurnState,
    session: ConversationSession,
    turn_counter: u64,
}

impl ChatRuntime {
    pub fn new(config: ChatConfig, event_bus: EventBus) -> Self {
        let session = ConversationSession::init(&config.system_prompt);
        Self {
            config,
            event_bus,
            state: TurnState::Idle,
            session,
            turn_counter: 0,
        }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn history(&self) -> &[Message] {
        self.session.history()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, TurnState::AwaitingModel | TurnState::Streaming)
    }

    /// Start a fresh chat: seed a new session and greet the user.
    ///
    /// Any previous session is closed first. A display failure while
    /// greeting is logged and answered with a short apology.
    pub async fn on_chat_start(&mut self, display: &dyn DisplayPort) {
        self.session.close();
        self.session = ConversationSession::init(&self.config.system_prompt);
        self.state = TurnState::Idle;
        self.turn_counter = 0;
        log::info!(
            "Chat session {} started (model: {})",
            self.session.id(),
            self.config.backend.model
        );
        self.event_bus.emit(ChatEvent::SessionStarted {
            session_id: self.session.id().to_string(),
        });

        let greeting = self.config.greeting();
        if let Err(e) = stream_text(display, &greeting).await {
            log::error!("Error in chat initialization: {}", e);
            self.event_bus.emit(ChatEvent::Error {
                message: e.to_string(),
            });
            if let Err(e) = display.post(START_FAILED_TEXT).await {
                log::error!("Could not report chat initialization failure: {}", e);
            }
        }
    }

    /// Handle one inbound user message end to end.
    pub async fn on_message(
        &mut self,
        text: &str,
        attachments: &[Attachment],
        llm: &dyn InferencePort,
        display: &dyn DisplayPort,
    ) -> TurnOutcome {
        self.turn_counter += 1;
        let turn_id = self.turn_counter;
        self.event_bus.emit(ChatEvent::TurnStart { turn_id });
        self.event_bus.emit(ChatEvent::UserMessage {
            text: text.to_string(),
            attachment_names: attachments.iter().map(|a| a.name.clone()).collect(),
        });

        let images = image_refs(attachments);
        let outcome = self.process_message(text, images, llm).await;

        self.state = TurnState::Streaming;
        if let Err(e) = stream_text(display, outcome.text()).await {
            log::error!("Error in message handler: {}", e);
            self.event_bus.emit(ChatEvent::Error {
                message: e.to_string(),
            });
            let apology = format!("Sorry, I encountered an error: {}", e);
            if let Err(e) = display.post(&apology).await {
                log::error!("Could not report display failure: {}", e);
            }
        }

        self.state = match &outcome {
            TurnOutcome::Reply(_) => TurnState::Idle,
            TurnOutcome::Failed(text) => TurnState::Error(text.clone()),
        };
        self.event_bus.emit(ChatEvent::TurnEnd { turn_id });
        outcome
    }

    /// The model call for one turn: append the user message, ask the
    /// backend with the whole history, append its reply.
    pub async fn process_message(
        &mut self,
        text: &str,
        images: Vec<String>,
        llm: &dyn InferencePort,
    ) -> TurnOutcome {
        self.state = TurnState::AwaitingModel;
        self.event_bus.emit(ChatEvent::AwaitingModel);

        match self.call_model(text, images, llm).await {
            Ok(reply) => TurnOutcome::Reply(reply),
            Err(e) => {
                log::error!("Error processing message: {}", e);
                self.event_bus.emit(ChatEvent::Error {
                    message: e.to_string(),
                });
                TurnOutcome::Failed(format!("I encountered an error: {}", e))
            }
        }
    }

    async fn call_model(
        &mut self,
        text: &str,
        images: Vec<String>,
        llm: &dyn InferencePort,
    ) -> Result<String> {
        let image_count = images.len();
        self.session.append_user_message(text, images)?;

        let req = ChatRequest {
            model: self.config.backend.model.clone(),
            messages: self.session.history().to_vec(),
            stream: false,
        };
        log::debug!(
            "Calling {} with {} messages ({} images on this turn)",
            req.model,
            req.messages.len(),
            image_count
        );

        let response = llm.chat(req).await?;
        if let Some(usage) = &response.usage {
            log::debug!(
                "Backend used {} prompt / {} completion tokens in {}ms",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_duration_ns / 1_000_000
            );
        }

        let reply = response.message.content;
        self.session.append_assistant_message(reply.as_str())?;
        Ok(reply)
    }
}

/// Stream `text` to the display one character at a time, then finalize.
pub async fn stream_text(display: &dyn DisplayPort, text: &str) -> Result<()> {
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        display.stream_token(ch.encode_utf8(&mut buf)).await?;
    }
    display.send().await
}
