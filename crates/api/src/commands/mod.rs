//! Transport-agnostic command handlers

pub mod detect;
pub mod dispatch;
pub mod health;
pub mod mask;

pub use detect::{detect, DetectReply};
pub use dispatch::{dispatch, handle_line, CommandReply, CommandRequest};
pub use health::{health, info, metrics, readiness};
pub use mask::{clear_cache, mask, unmask};
