//! Cache key derivation

use complimask_common::privacy::hash::{HashAlgorithm, HashConfig, SecureHasher};
use complimask_domain::{MaskError, Result};
use tracing::warn;

/// Derives `hash(salt|dataType|role|value)` cache keys.
#[derive(Debug, Clone)]
pub struct DecisionKeyer {
    hasher: SecureHasher,
}

impl DecisionKeyer {
    /// Keyer with a configured salt, or a random process-local salt.
    ///
    /// # Errors
    /// Returns `MaskError::Config` for an unknown algorithm or an empty salt.
    pub fn new(salt: Option<&str>, algorithm: &str) -> Result<Self> {
        let algorithm: HashAlgorithm =
            algorithm.parse().map_err(|e| MaskError::Config(format!("cache hash algorithm: {e}")))?;

        let config = match salt {
            Some(salt) => HashConfig::with_salt(salt, algorithm),
            None => {
                warn!("no cache salt configured; using a random per-process salt");
                HashConfig::with_algorithm(algorithm)
            }
        }
        .map_err(|e| MaskError::Config(format!("cache salt: {e}")))?;

        let hasher =
            SecureHasher::with_config(config).map_err(|e| MaskError::Config(e.to_string()))?;
        Ok(Self { hasher })
    }

    /// Salted fingerprint of the request; the raw value never appears in it.
    pub fn key(&self, data_type: &str, role: &str, value: &str) -> String {
        self.hasher.fingerprint(&[data_type, role, value])
    }
}
