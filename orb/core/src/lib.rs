//! Orb Core - Headless State Synchronization for the Orb Console
//!
//! This crate owns all client-side state of the Orb console, completely
//! independent of how it is drawn. A surface (the line console, a TUI, a web
//! view, a test) drives the controllers and renders the snapshots they
//! publish.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Surface                             │
//! │     user action                      Arc<Snapshot> (watch)   │
//! └──────────┬───────────────────────────────────▲───────────────┘
//!            │                                   │
//! ┌──────────▼───────────────────────────────────┴───────────────┐
//! │  ChatSessionController  ThoughtLogController  ProjectBoard   │
//! │        │                      │                              │
//! │        └──── Dispatcher ──────┘   (spawned kernel calls,     │
//! │                  │                 results drained by poll)  │
//! └──────────────────┼───────────────────────────────────────────┘
//!                    │
//!            KernelBackend (POST /chat, POST /thoughts)
//! ```
//!
//! # Key Types
//!
//! - [`ChatSessionController`]: transcript and typing flag
//! - [`ThoughtLogController`]: optimistic, never-rolled-back note log
//! - [`ProjectBoardController`]: projects and todos with structural updates
//! - [`KernelBackend`]: the kernel bridge, real or mocked
//! - [`OrbConfig`]: layered configuration
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use orb_core::{load_config, ChatSessionController, HttpKernelBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let backend = Arc::new(HttpKernelBackend::from_config(&config)?);
//!     let mut chat = ChatSessionController::new(backend);
//!
//!     chat.submit("hello");
//!     chat.settle_next().await;
//!
//!     for message in chat.snapshot().messages() {
//!         println!("{}: {}", message.role.label(), message.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on terminal or CLI crates. It's pure
//! state logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod board;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod observe;
pub mod thoughts;

// Re-exports for convenience
pub use backend::{
    ChatReply, ChatRequest, HttpKernelBackend, KernelBackend, ThoughtAck, ThoughtRequest,
    DEGRADED_STATUS, NO_REPLY,
};
pub use board::{BoardSnapshot, Project, ProjectBoardController, Todo};
pub use chat::{ChatSessionController, ChatSnapshot, Message, MessageRole, KERNEL_UNREACHABLE};
pub use dispatch::{RequestId, Settled};
pub use error::KernelError;
pub use observe::SnapshotCell;
pub use thoughts::{
    NoticeLevel, ThoughtEntry, ThoughtLogController, ThoughtSnapshot, SAVED_LOCALLY,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, OrbConfig, OrbToml,
};
