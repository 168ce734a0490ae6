//! # Complimask Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Service configuration loading (environment variables, JSON/TOML files)
//! - Policy document loading
//! - HTTP client with bounded retries
//! - External suggestion providers (Gemini)
//!
//! ## Architecture
//! - Implements traits defined in `complimask-core`
//! - Contains all "impure" code (file and network I/O)

pub mod config;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use config::{load, load_from_env, load_from_file, load_policy};
pub use http::{HttpClient, HttpError};
pub use integrations::gemini::{GeminiClient, GeminiError};
