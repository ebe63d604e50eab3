//! Per-session turn queue.
//!
//! Each turn depends on the full history of the turns before it, so a
//! message that arrives while a turn is still waiting on the backend is
//! queued and handled once that turn has appended its reply.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use localchat_types::attachment::Attachment;

use crate::ports::{DisplayPort, InferencePort};
use crate::runtime::{ChatRuntime, TurnOutcome};

/// A user message waiting for its turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl InboundMessage {
    pub fn new(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            text: text.into(),
            attachments,
        }
    }
}

/// FIFO of inbound messages plus a flag telling whether a drain loop is
/// already running. Clone-cheap via Rc; single-threaded.
#[derive(Clone, Default)]
pub struct TurnQueue {
    pending: Rc<RefCell<VecDeque<InboundMessage>>>,
    draining: Rc<Cell<bool>>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message. Returns true when no drain loop is running and the
    /// caller must start one with [`drain_turns`].
    pub fn enqueue(&self, msg: InboundMessage) -> bool {
        self.pending.borrow_mut().push_back(msg);
        if self.draining.get() {
            false
        } else {
            self.draining.set(true);
            true
        }
    }

    /// Next message to handle. Clears the draining flag once empty.
    pub fn next(&self) -> Option<InboundMessage> {
        let msg = self.pending.borrow_mut().pop_front();
        if msg.is_none() {
            self.draining.set(false);
        }
        msg
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn is_draining(&self) -> bool {
        self.draining.get()
    }
}

/// Run queued turns one after another until the queue is empty.
///
/// The runtime is mutably borrowed for the length of each turn, across the
/// backend await. Other callers must use `try_borrow_mut` while draining.
pub async fn drain_turns(
    runtime: &RefCell<ChatRuntime>,
    queue: &TurnQueue,
    llm: &dyn InferencePort,
    display: &dyn DisplayPort,
) -> Vec<TurnOutcome> {
    let mut outcomes = Vec::new();
    while let Some(msg) = queue.next() {
        let outcome = {
            let mut rt = runtime.borrow_mut();
            rt.on_message(&msg.text, &msg.attachments, llm, display).await
        };
        outcomes.push(outcome);
    }
    outcomes
}
