//! Kernel Backend Traits
//!
//! Wire types and the trait every kernel backend implements. Controllers only
//! talk to the kernel through [`KernelBackend`], so tests swap in scripted
//! backends without touching the network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// Reply text used when the kernel answers without `reply` or `message`
pub const NO_REPLY: &str = "No reply";

/// Status the bridge reports when it has no brain configured for thoughts
pub const DEGRADED_STATUS: &str = "no-brain-configured";

/// Body of `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// The user's message, sent as typed
    pub message: String,
}

impl ChatRequest {
    /// Create a chat request
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response of `POST /chat`
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    /// Primary reply field
    #[serde(default)]
    pub reply: Option<String>,
    /// Fallback field used by some bridge versions
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatReply {
    /// Create a reply carrying `reply`
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            message: None,
        }
    }

    /// Text to show for this reply: `reply`, then `message`, then [`NO_REPLY`]
    ///
    /// Empty strings count as absent.
    #[must_use]
    pub fn into_content(self) -> String {
        self.reply
            .filter(|r| !r.is_empty())
            .or(self.message.filter(|m| !m.is_empty()))
            .unwrap_or_else(|| NO_REPLY.to_string())
    }
}

/// Body of `POST /thoughts`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThoughtRequest {
    /// Trimmed thought text
    pub content: String,
}

impl ThoughtRequest {
    /// Create a thought request
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Response of `POST /thoughts`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ThoughtAck {
    /// Storage status reported by the bridge
    pub status: String,
}

impl ThoughtAck {
    /// Create an acknowledgement
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }

    /// Convert a degraded acknowledgement into [`KernelError::DegradedMode`]
    ///
    /// # Errors
    ///
    /// Returns `DegradedMode` when `status` equals `degraded_status`.
    pub fn check(self, degraded_status: &str) -> Result<Self, KernelError> {
        if self.status == degraded_status {
            Err(KernelError::DegradedMode {
                status: self.status,
            })
        } else {
            Ok(self)
        }
    }
}

/// Kernel backend trait
///
/// Implement this trait to point the controllers at a different kernel.
#[async_trait]
pub trait KernelBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Check if the kernel is reachable
    async fn health_check(&self) -> bool;

    /// Send one chat message and wait for the reply
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, KernelError>;

    /// Store one thought and wait for the acknowledgement
    async fn post_thought(&self, request: &ThoughtRequest) -> Result<ThoughtAck, KernelError>;
}
