//! Service configuration structures.
//!
//! Loaded by `complimask-infra` from environment variables or a JSON/TOML
//! file. Every section has serde defaults so a file only needs
//! `policy_path`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CACHE_MAX_SIZE, DEFAULT_CACHE_SWEEP_INTERVAL_MS, DEFAULT_CACHE_TTL_MS,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_HASH_ALGORITHM,
    DEFAULT_SUGGESTION_COOLDOWN_SECS, DEFAULT_SUGGESTION_TIMEOUT_MS,
};
use crate::types::masking::MaskLevel;

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Path to the policy document (JSON or TOML).
    pub policy_path: PathBuf,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub suggestion: SuggestionSettings,
    #[serde(default)]
    pub gemini: Option<GeminiSettings>,
}

impl ServiceConfig {
    /// Default settings around a policy file.
    pub fn new(policy_path: impl Into<PathBuf>) -> Self {
        Self {
            policy_path: policy_path.into(),
            cache: CacheSettings::default(),
            suggestion: SuggestionSettings::default(),
            gemini: None,
        }
    }
}

/// Decision cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_ms: u64,
    pub max_size: usize,
    /// Fingerprint salt. A random salt is generated when absent, which
    /// makes fingerprints process-local.
    pub salt: Option<String>,
    /// `sha256`, `sha384` or `sha512`.
    pub hash_algorithm: String,
    /// Background expiry sweep interval; `0` disables the sweeper.
    pub sweep_interval_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: DEFAULT_CACHE_TTL_MS,
            max_size: DEFAULT_CACHE_MAX_SIZE,
            salt: None,
            hash_algorithm: DEFAULT_HASH_ALGORITHM.to_string(),
            sweep_interval_ms: DEFAULT_CACHE_SWEEP_INTERVAL_MS,
        }
    }
}

/// Suggestion chain configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    pub enabled: bool,
    /// Per-provider call budget.
    pub timeout_ms: u64,
    /// How long a failed provider stays short-circuited.
    pub cooldown_secs: u64,
    /// Local data type -> level rules, consulted before remote providers.
    pub static_rules: BTreeMap<String, MaskLevel>,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: DEFAULT_SUGGESTION_TIMEOUT_MS,
            cooldown_secs: DEFAULT_SUGGESTION_COOLDOWN_SECS,
            static_rules: BTreeMap::new(),
        }
    }
}

/// Generative suggestion provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl GeminiSettings {
    /// Default model and endpoint for `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}
