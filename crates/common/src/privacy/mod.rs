//! Privacy Module - Portable Core
//!
//! Salted, non-reversible fingerprints for values that must never be stored
//! or logged in the clear.

pub mod hash;

// Re-export commonly used types
pub use hash::{HashAlgorithm, HashConfig, HashError, HashResult, SecureHasher};
