//! Configuration loading and management
//!
//! This module provides utilities for loading the service configuration
//! from environment variables and files, and for reading the policy
//! document it points at.

pub mod loader;
pub mod policy;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
pub use policy::load_policy;
