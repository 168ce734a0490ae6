use std::fmt;
use std::str::FromStr;

use rand::{thread_rng, Rng};

use super::error::{HashError, HashResult};

const DEFAULT_SALT_LENGTH: usize = 32;

/// Salt and digest used for fingerprints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashConfig {
    pub org_salt: String,
    pub algorithm: HashAlgorithm,
}

/// Supported SHA-2 digests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Length of the hex digest.
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha384 => write!(f, "sha384"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            other => Err(HashError::ConfigurationError(format!(
                "Unsupported hash algorithm: {other}"
            ))),
        }
    }
}

impl HashConfig {
    /// SHA-256 with a freshly generated salt.
    pub fn new() -> HashResult<Self> {
        Self::with_algorithm(HashAlgorithm::Sha256)
    }

    /// `algorithm` with a freshly generated salt.
    pub fn with_algorithm(algorithm: HashAlgorithm) -> HashResult<Self> {
        Ok(Self { org_salt: generate_secure_salt(DEFAULT_SALT_LENGTH)?, algorithm })
    }

    /// Use a fixed salt so fingerprints are stable across processes.
    pub fn with_salt(salt: impl Into<String>, algorithm: HashAlgorithm) -> HashResult<Self> {
        let salt = salt.into();
        if salt.is_empty() {
            return Err(HashError::InvalidInput("Salt cannot be empty".to_string()));
        }
        Ok(Self { org_salt: salt, algorithm })
    }
}

/// Hex-encoded random salt of `length` bytes.
pub fn generate_secure_salt(length: usize) -> HashResult<String> {
    if length == 0 {
        return Err(HashError::InvalidInput("Salt length cannot be zero".to_string()));
    }

    let mut rng = thread_rng();
    let salt: Vec<u8> = (0..length).map(|_| rng.gen()).collect();

    Ok(hex::encode(salt))
}
