use sha2::{Digest, Sha256, Sha384, Sha512};

use super::config::{HashAlgorithm, HashConfig};
use super::error::{HashError, HashResult};

/// Separator placed between the salt and each fingerprint part.
const PART_SEPARATOR: &str = "|";

/// Salted SHA-2 hasher.
///
/// `fingerprint(["SSN", "Teller", "123-45-6789"])` hashes
/// `"{salt}|SSN|Teller|123-45-6789"` and returns lowercase hex. Parts are
/// hashed in order, so callers must keep a fixed part order for a key space.
#[derive(Debug, Clone)]
pub struct SecureHasher {
    config: HashConfig,
}

impl SecureHasher {
    /// SHA-256 with a random, process-local salt.
    pub fn new() -> HashResult<Self> {
        Ok(Self { config: HashConfig::new()? })
    }

    /// Hasher over an explicit configuration.
    ///
    /// # Errors
    /// Returns `HashError::ConfigurationError` if the salt is empty.
    pub fn with_config(config: HashConfig) -> HashResult<Self> {
        if config.org_salt.is_empty() {
            return Err(HashError::ConfigurationError("Organization salt must be set".to_string()));
        }
        Ok(Self { config })
    }

    /// Hash `salt|part1|part2|...` into a hex digest.
    pub fn fingerprint(&self, parts: &[&str]) -> String {
        match self.config.algorithm {
            HashAlgorithm::Sha256 => self.digest::<Sha256>(parts),
            HashAlgorithm::Sha384 => self.digest::<Sha384>(parts),
            HashAlgorithm::Sha512 => self.digest::<Sha512>(parts),
        }
    }

    fn digest<D: Digest>(&self, parts: &[&str]) -> String {
        let mut hasher = D::new();
        hasher.update(self.config.org_salt.as_bytes());
        for part in parts {
            hasher.update(PART_SEPARATOR.as_bytes());
            hasher.update(part.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
