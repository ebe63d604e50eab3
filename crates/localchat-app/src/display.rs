//! Display port backed by the event bus. The UI drains the events each
//! frame and grows the on-screen message from them.

use async_trait::async_trait;
use localchat_core::event_bus::EventBus;
use localchat_core::ports::DisplayPort;
use localchat_types::Result;
use localchat_types::event::ChatEvent;

pub struct EventBusDisplay {
    bus: EventBus,
}

impl EventBusDisplay {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

#[async_trait(?Send)]
impl DisplayPort for EventBusDisplay {
    async fn stream_token(&self, token: &str) -> Result<()> {
        self.bus.emit(ChatEvent::Token {
            text: token.to_string(),
        });
        Ok(())
    }

    async fn send(&self) -> Result<()> {
        self.bus.emit(ChatEvent::MessageSent);
        Ok(())
    }
}
