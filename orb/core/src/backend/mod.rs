//! Kernel Backend Integration
//!
//! Access to the kernel bridge through a common trait interface.
//!
//! # Available Backends
//!
//! - **HTTP bridge**: JSON-over-HTTP client for `/chat` and `/thoughts`
//!
//! # Usage
//!
//! ```ignore
//! use orb_core::backend::{ChatRequest, HttpKernelBackend, KernelBackend};
//!
//! let backend = HttpKernelBackend::from_config(&config)?;
//! let reply = backend.chat(&ChatRequest::new("hello")).await?;
//! ```

mod http;
mod traits;

pub use http::HttpKernelBackend;
pub use traits::{
    ChatReply, ChatRequest, KernelBackend, ThoughtAck, ThoughtRequest, DEGRADED_STATUS, NO_REPLY,
};
