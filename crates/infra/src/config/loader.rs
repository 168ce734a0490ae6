//! Configuration loader
//!
//! Loads the service configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `COMPLIMASK_POLICY_PATH` is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `COMPLIMASK_POLICY_PATH`: Policy document path (required)
//! - `COMPLIMASK_CACHE_ENABLED`: Whether decisions are cached (true/false)
//! - `COMPLIMASK_CACHE_TTL_MS`: Decision cache TTL in milliseconds
//! - `COMPLIMASK_CACHE_MAX_SIZE`: Decision cache capacity
//! - `COMPLIMASK_CACHE_SALT`: Fingerprint salt for cache keys
//! - `COMPLIMASK_SUGGESTIONS_ENABLED`: Whether the suggestion chain runs
//! - `COMPLIMASK_SUGGESTION_TIMEOUT_MS`: Per-provider call budget
//! - `COMPLIMASK_SUGGESTION_COOLDOWN_SECS`: Circuit breaker cool-down
//! - `GOOGLE_API_KEY`: Enables the Gemini suggestion provider
//! - `COMPLIMASK_GEMINI_MODEL`: Gemini model name
//!
//! `GOOGLE_API_KEY` is also honoured in file mode so the key can stay out
//! of the config file.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./complimask.json` or `./complimask.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `./config/complimask.json` or `./config/complimask.toml`
//! 4. Relative to executable location
//!
//! A relative `policy_path` in a config file is resolved against the
//! directory holding that file.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use complimask_domain::{GeminiSettings, MaskError, Result, ServiceConfig};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["complimask.json", "complimask.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the policy path
/// variable is missing or any value is invalid, falls back to loading from
/// a config file.
///
/// # Errors
/// Returns `MaskError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ServiceConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `COMPLIMASK_POLICY_PATH` is required; everything else falls back to
/// the defaults in [`ServiceConfig::new`].
///
/// # Errors
/// Returns `MaskError::Config` if the policy path is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<ServiceConfig> {
    let mut config = ServiceConfig::new(env_var("COMPLIMASK_POLICY_PATH")?);

    config.cache.enabled = env_bool("COMPLIMASK_CACHE_ENABLED", config.cache.enabled);
    if let Some(ttl_ms) = env_parse::<u64>("COMPLIMASK_CACHE_TTL_MS")? {
        config.cache.ttl_ms = ttl_ms;
    }
    if let Some(max_size) = env_parse::<usize>("COMPLIMASK_CACHE_MAX_SIZE")? {
        config.cache.max_size = max_size;
    }
    config.cache.salt = env_non_empty("COMPLIMASK_CACHE_SALT");

    config.suggestion.enabled =
        env_bool("COMPLIMASK_SUGGESTIONS_ENABLED", config.suggestion.enabled);
    if let Some(timeout_ms) = env_parse::<u64>("COMPLIMASK_SUGGESTION_TIMEOUT_MS")? {
        config.suggestion.timeout_ms = timeout_ms;
    }
    if let Some(cooldown) = env_parse::<u64>("COMPLIMASK_SUGGESTION_COOLDOWN_SECS")? {
        config.suggestion.cooldown_secs = cooldown;
    }

    config.gemini = gemini_from_env();

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MaskError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ServiceConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MaskError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MaskError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MaskError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;

    if config.policy_path.is_relative() {
        if let Some(dir) = config_path.parent() {
            config.policy_path = dir.join(&config.policy_path);
        }
    }

    if let Some(from_env) = gemini_from_env() {
        match config.gemini.as_mut() {
            Some(settings) => settings.api_key = from_env.api_key,
            None => config.gemini = Some(from_env),
        }
    }

    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `MaskError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<ServiceConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MaskError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MaskError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(MaskError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join("config"));
        dirs.insert(0, cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
            dirs.push(exe_dir.join("config"));
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn gemini_from_env() -> Option<GeminiSettings> {
    let mut settings = GeminiSettings::new(env_non_empty("GOOGLE_API_KEY")?);
    if let Some(model) = env_non_empty("COMPLIMASK_GEMINI_MODEL") {
        settings.model = model;
    }
    Some(settings)
}

/// Get required environment variable
///
/// # Errors
/// Returns `MaskError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| MaskError::Config(format!("Missing required environment variable: {key}")))
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable.
///
/// # Errors
/// Returns `MaskError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    env_non_empty(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| MaskError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
