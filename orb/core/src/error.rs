//! Kernel Errors
//!
//! Failure taxonomy for calls to the kernel bridge. Every variant is
//! recoverable: the controller that issued the call returns to idle and the
//! only way forward is another user-initiated call.

use serde::Deserialize;
use thiserror::Error;

/// Errors produced by a [`KernelBackend`](crate::backend::KernelBackend) call
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    /// The request could not be made or the transport failed
    #[error("{0}")]
    NetworkFailure(String),

    /// The call completed but the HTTP status signals failure
    #[error("{description}")]
    BackendError {
        /// HTTP status code
        status: u16,
        /// Status text from the body, or `HTTP <code>` when there is none
        description: String,
    },

    /// The call completed with a body that is not the expected JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The backend is reachable but declined to perform the action
    #[error("Backend not configured ({status})")]
    DegradedMode {
        /// Status value reported by the backend
        status: String,
    },
}

/// Error body shape used by the bridge when it reports a status
#[derive(Deserialize)]
struct StatusBody {
    status: Option<String>,
}

impl KernelError {
    /// Build a [`KernelError::BackendError`] from a non-success response
    ///
    /// The bridge's `status` field is preferred as the description; anything
    /// else falls back to `HTTP <code>`.
    #[must_use]
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let description = serde_json::from_slice::<StatusBody>(body)
            .ok()
            .and_then(|b| b.status)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self::BackendError {
            status,
            description,
        }
    }
}

impl From<reqwest::Error> for KernelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}
