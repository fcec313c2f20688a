//! Per-widget submission cycle.
//!
//! ```text
//! IDLE --submit()--> DISPATCHED --settle(Replied)--> IDLE
//!                               --settle(Failed)---> IDLE
//! ```
//!
//! `submit` does all of its work synchronously (gate, draft clear, user
//! append, busy) before any future is created, and `settle` consumes the
//! [`Submission`] token so a dispatched request settles at most once.

use log::{debug, warn};

use crate::conversation::Conversation;
use crate::dispatcher::FALLBACK_REPLY;
use crate::error::TransportError;
use crate::input::InputController;
use crate::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dispatched,
}

/// Proof that a user message was appended and a request is owed.
///
/// Not `Clone`: the only way to get rid of one is [`ChatSession::settle`].
#[derive(Debug)]
#[must_use = "a submission left unsettled keeps the widget busy"]
pub struct Submission {
    text: String,
    position: usize,
}

impl Submission {
    /// Submitted text, exactly as it was in the draft.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Index of the user message this submission appended.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Outcome of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Replied(String),
    Failed(TransportError),
}

impl Settlement {
    /// Text of the bot message this settlement produces.
    pub fn content(&self) -> &str {
        match self {
            Settlement::Replied(text) => text,
            Settlement::Failed(_) => FALLBACK_REPLY,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Settlement::Failed(_))
    }
}

/// Conversation plus input state for one mounted widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    conversation: Conversation,
    input: InputController,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.list()
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn draft(&self) -> &str {
        self.input.draft()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.input.set_draft(text);
    }

    pub fn is_busy(&self) -> bool {
        self.input.is_busy()
    }

    pub fn can_submit(&self) -> bool {
        self.input.can_submit()
    }

    pub fn phase(&self) -> Phase {
        if self.input.is_busy() {
            Phase::Dispatched
        } else {
            Phase::Idle
        }
    }

    /// Moves the draft into the conversation as a user message and marks the
    /// widget busy. A blank draft or a pending request makes this a silent
    /// no-op returning `None`.
    pub fn submit(&mut self) -> Option<Submission> {
        let text = self.input.take_for_dispatch()?;
        let position = self.conversation.len();
        self.conversation.append(Message::user(text.clone()));
        debug!("Submitted message #{position} ({} bytes)", text.len());
        Some(Submission { text, position })
    }

    /// Appends the bot reply (or the fallback) for `submission`, then clears busy.
    pub fn settle(&mut self, submission: Submission, settlement: Settlement) {
        debug_assert!(self.input.is_busy(), "settle called while idle");
        if let Settlement::Failed(err) = &settlement {
            warn!("Reply to message #{} failed: {err}", submission.position);
        }
        self.conversation.append(Message::bot(settlement.content()));
        self.input.release();
    }
}
