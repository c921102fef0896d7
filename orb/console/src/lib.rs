//! Orb Console - Line-oriented surface for the Orb kernel
//!
//! A thin client over `orb-core`: it reads commands from an input stream,
//! drives the controllers and prints what their snapshots show. All state
//! synchronization lives in the core.
//!
//! # Modules
//!
//! - **app**: event loop over input lines and kernel completions
//! - **commands**: slash-command parser
//! - **render**: snapshot to text

pub mod app;
pub mod commands;
pub mod render;

pub use app::App;
pub use commands::Command;
