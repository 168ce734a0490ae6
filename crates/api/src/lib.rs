//! # Complimask API
//!
//! Process glue - context wiring, command handlers and the binary entry point.
//!
//! This crate contains:
//! - Command handlers (`mask`, `unmask`, `detect`, `health`, `info`, ...)
//! - Application context (dependency injection)
//! - JSON-lines dispatch used by the `complimask` binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Handlers take `&AppContext` and raw JSON bodies so any transport can
//!   call them

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
