//! Integration tests for privacy module
//!
//! Tests salted fingerprints used as cache keys for sensitive values.

#![cfg(feature = "runtime")]

use complimask_common::privacy::hash::{HashAlgorithm, HashConfig, SecureHasher};

/// Validates that fingerprints never contain the raw value.
///
/// # Test Steps
/// 1. Fingerprint an SSN with a fixed salt
/// 2. Verify the digest is hex and does not contain the raw digits
#[test]
fn test_fingerprint_hides_raw_value() {
    let config = HashConfig::with_salt("org-salt", HashAlgorithm::Sha256).expect("valid salt");
    let hasher = SecureHasher::with_config(config).expect("valid config");

    let digest = hasher.fingerprint(&["SSN", "Teller", "123456789"]);

    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(!digest.contains("123456789"));
}

/// Validates that random-salt hashers are process-local.
///
/// # Test Steps
/// 1. Build two hashers with generated salts
/// 2. Verify they disagree on the same input
#[test]
fn test_generated_salts_differ() {
    let a = SecureHasher::new().expect("hasher");
    let b = SecureHasher::new().expect("hasher");
    let parts = ["EMAIL", "Teller", "a@b.c"];
    assert_ne!(a.fingerprint(&parts), b.fingerprint(&parts));
}
