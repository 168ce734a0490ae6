//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Decision cache defaults
pub const DEFAULT_CACHE_TTL_MS: u64 = 60 * 60 * 1000; // 1 hour
pub const DEFAULT_CACHE_MAX_SIZE: usize = 1000;
pub const DEFAULT_CACHE_SWEEP_INTERVAL_MS: u64 = 60 * 1000;
pub const DEFAULT_HASH_ALGORITHM: &str = "sha256";

// Suggestion chain defaults
pub const DEFAULT_SUGGESTION_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_SUGGESTION_COOLDOWN_SECS: u64 = 5 * 60;

// Generative provider defaults
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// Policy defaults
pub const DEFAULT_PRIVILEGED_ROLE: &str = "Administrator";
pub const DEFAULT_ELEVATED_ROLES: [&str; 3] = ["Administrator", "Regional Manager", "Manager"];

// Fallback decision
pub const FALLBACK_MASKED_VALUE: &str = "***";
pub const FALLBACK_REASON: &str = "fallback due to error";

/// Known data-type names.
///
/// Data types are an open set; policies may name types not listed here and
/// the engine treats them as low-risk generic values.
pub mod data_types {
    pub const SSN: &str = "SSN";
    pub const ACCOUNT_NUMBER: &str = "ACCOUNT_NUMBER";
    pub const PHONE: &str = "PHONE";
    pub const EMAIL: &str = "EMAIL";
    pub const CREDIT_CARD: &str = "CREDIT_CARD";
    pub const ADDRESS: &str = "ADDRESS";
    pub const NAME: &str = "NAME";
    pub const DATE_OF_BIRTH: &str = "DATE_OF_BIRTH";
    pub const IP_ADDRESS: &str = "IP_ADDRESS";
    pub const LICENSE_PLATE: &str = "LICENSE_PLATE";
    pub const PASSPORT_NUMBER: &str = "PASSPORT_NUMBER";
    pub const IBAN: &str = "IBAN";
    pub const CUSTOM: &str = "CUSTOM";

    /// Every known data-type name.
    pub const ALL: [&str; 13] = [
        SSN,
        ACCOUNT_NUMBER,
        PHONE,
        EMAIL,
        CREDIT_CARD,
        ADDRESS,
        NAME,
        DATE_OF_BIRTH,
        IP_ADDRESS,
        LICENSE_PLATE,
        PASSPORT_NUMBER,
        IBAN,
        CUSTOM,
    ];
}
