//! Chat Session
//!
//! Owns the message transcript and the typing flag for the conversation with
//! the kernel.
//!
//! # State Machine
//!
//! ```text
//! Idle --submit--> Sending --reply or failure--> Idle
//! ```
//!
//! Several submits may be in flight at once. Replies are appended in the order
//! they arrive, which is not necessarily the order the questions were asked,
//! and every reply returns the session to Idle even if others are still out.
//! The controller's [`in_flight`](ChatSessionController::in_flight) count is
//! what tells a loop whether more replies are coming.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::backend::{ChatReply, ChatRequest, KernelBackend};
use crate::dispatch::{Dispatcher, RequestId, Settled};
use crate::observe::SnapshotCell;

/// Assistant text appended when the kernel call fails for any reason
pub const KERNEL_UNREACHABLE: &str = "Error: Kernel unreachable.";

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The person at the keyboard
    User,
    /// The kernel (or the synthetic error reply)
    Assistant,
}

impl MessageRole {
    /// Lowercase label used by the rendering layer
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One entry of the transcript
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: MessageRole,
    /// Message content
    pub content: String,
}

impl Message {
    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// An assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Immutable view of the chat session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatSnapshot {
    /// Messages in send/arrival order
    pub transcript: Vector<Arc<Message>>,
    /// Text in the input box
    pub pending_input: String,
    /// Set by a submit, cleared by the next reply
    pub awaiting_reply: bool,
}

impl ChatSnapshot {
    /// Whether the typing indicator is on
    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Transcript as plain messages
    pub fn messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.transcript.iter().map(AsRef::as_ref)
    }

    /// Last message in the transcript
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.transcript.back().map(AsRef::as_ref)
    }

    /// Replace the input box text
    #[must_use]
    pub fn with_pending_input(&self, text: impl Into<String>) -> Self {
        Self {
            pending_input: text.into(),
            ..self.clone()
        }
    }

    /// Append the user's message and mark a reply as outstanding
    ///
    /// Returns `None` for blank text. The text is stored exactly as typed.
    #[must_use]
    pub fn with_user_message(&self, text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        let mut next = self.clone();
        next.transcript.push_back(Arc::new(Message::user(text)));
        next.pending_input.clear();
        next.awaiting_reply = true;
        Some(next)
    }

    /// Append an assistant reply and turn the typing indicator off
    #[must_use]
    pub fn with_reply(&self, content: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.transcript.push_back(Arc::new(Message::assistant(content)));
        next.awaiting_reply = false;
        next
    }
}

/// Controller for the chat transcript
pub struct ChatSessionController<B: KernelBackend + 'static> {
    backend: Arc<B>,
    cell: SnapshotCell<ChatSnapshot>,
    dispatcher: Dispatcher<ChatReply>,
}

impl<B: KernelBackend + 'static> ChatSessionController<B> {
    /// Create a controller with an empty transcript
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cell: SnapshotCell::new(ChatSnapshot::default()),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<ChatSnapshot> {
        self.cell.current()
    }

    /// Observe every future snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<ChatSnapshot>> {
        self.cell.subscribe()
    }

    /// Requests issued and not yet applied
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Replace the input box text
    pub fn set_pending_input(&mut self, text: impl Into<String>) -> Arc<ChatSnapshot> {
        let next = self.cell.current().with_pending_input(text);
        self.cell.publish(next)
    }

    /// Send `text` to the kernel
    ///
    /// Appends the user message and clears the input immediately; the reply is
    /// applied later by [`poll`](Self::poll) or [`settle_next`](Self::settle_next).
    /// Blank text is a no-op and returns `None`. Must be called from within a
    /// Tokio runtime.
    pub fn submit(&mut self, text: &str) -> Option<(RequestId, Arc<ChatSnapshot>)> {
        let Some(next) = self.cell.current().with_user_message(text) else {
            tracing::debug!("Ignoring blank chat submit");
            return None;
        };
        let snapshot = self.cell.publish(next);

        let backend = Arc::clone(&self.backend);
        let request = ChatRequest::new(text);
        let request_id = self
            .dispatcher
            .dispatch(async move { backend.chat(&request).await });

        tracing::debug!(
            request = %request_id,
            in_flight = self.dispatcher.in_flight(),
            "Chat message sent"
        );
        Some((request_id, snapshot))
    }

    /// Send whatever is in the input box
    pub fn submit_pending(&mut self) -> Option<(RequestId, Arc<ChatSnapshot>)> {
        let text = self.cell.current().pending_input.clone();
        self.submit(&text)
    }

    /// Apply every reply that has already arrived, without waiting
    ///
    /// Returns how many replies were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(settled) = self.dispatcher.try_next() {
            self.apply(settled);
            applied += 1;
        }
        applied
    }

    /// Wait for the next reply and apply it
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn settle_next(&mut self) -> bool {
        match self.dispatcher.next().await {
            Some(settled) => {
                self.apply(settled);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, settled: Settled<ChatReply>) {
        let content = match settled.outcome {
            Ok(reply) => {
                tracing::info!(request = %settled.request_id, "Kernel replied");
                reply.into_content()
            }
            Err(e) => {
                tracing::warn!(request = %settled.request_id, error = %e, "Chat request failed");
                KERNEL_UNREACHABLE.to_string()
            }
        };
        let next = self.cell.current().with_reply(content);
        self.cell.publish(next);
    }
}
