//! # Complimask Domain
//!
//! Business domain types for the masking decision engine.
//!
//! This crate contains:
//! - Mask levels, risk levels and decision results
//! - The policy document shape
//! - Request/response types for the mask and unmask operations
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Complimask crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
