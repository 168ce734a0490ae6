//! Secure Hashing Module - Portable Core
//!
//! Salted SHA-2 fingerprints over ordered string parts.

pub mod config;
pub mod error;
pub mod hasher;

// Re-export commonly used types
pub use config::{generate_secure_salt, HashAlgorithm, HashConfig};
pub use error::{HashError, HashResult};
pub use hasher::SecureHasher;
