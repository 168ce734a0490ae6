//! Gemini integration for mask level suggestions
//!
//! # Architecture
//!
//! - **Client**: `GeminiClient` wraps the `generateContent` endpoint and
//!   implements `SuggestionProvider`
//! - **Types**: request/response wire types and `GeminiError`
//!
//! The model is asked for exactly one level token. Anything else (extra
//! words, `CUSTOM_REGEX`, unknown names) is treated as "no suggestion".
//! Failures surface as `MaskError::SuggestionProvider`; the suggestion
//! chain logs them and trips the provider's circuit breaker.

pub mod client;
pub mod types;

pub use client::{value_shape, GeminiClient, GEMINI_PROVIDER};
pub use types::GeminiError;
