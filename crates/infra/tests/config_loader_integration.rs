//! Integration tests for configuration loading
//!
//! Tests the end-to-end path from a config file on disk to a loaded policy.

use std::fs;

use complimask_domain::{MaskError, MaskLevel, RiskLevel};
use complimask_infra::config;

const POLICY_JSON: &str = r#"{
    "roles": ["Administrator", "Teller"],
    "policy": {
        "Administrator": { "SSN": "FULL" },
        "Teller": { "SSN": "NONE", "EMAIL": "PARTIAL_LAST4" }
    },
    "riskByType": { "SSN": "HIGH", "EMAIL": "LOW" }
}"#;

/// Validates loading a config file that points at a sibling policy file.
///
/// # Test Steps
/// 1. Write `policy.json` and `complimask.toml` into a temp directory
/// 2. Load the config and verify the relative policy path was resolved
/// 3. Load the policy and verify levels and risks
#[test]
fn test_config_file_to_policy() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("policy.json"), POLICY_JSON).expect("write policy");
    fs::write(
        dir.path().join("complimask.toml"),
        r#"
policy_path = "policy.json"

[cache]
ttl_ms = 120000
salt = "integration"

[suggestion]
timeout_ms = 250

[suggestion.static_rules]
EMAIL = "MASK_ALL"
"#,
    )
    .expect("write config");

    let service_config =
        config::load_from_file(Some(dir.path().join("complimask.toml"))).expect("config loads");
    assert_eq!(service_config.policy_path, dir.path().join("policy.json"));
    assert_eq!(service_config.cache.ttl_ms, 120_000);
    assert_eq!(service_config.suggestion.timeout_ms, 250);
    assert_eq!(service_config.suggestion.static_rules.get("EMAIL"), Some(&MaskLevel::MaskAll));

    let store = config::load_policy(&service_config.policy_path).expect("policy loads");
    assert_eq!(store.roles().len(), 2);
    assert_eq!(store.get_level("Teller", "SSN"), Some(MaskLevel::None));
    assert_eq!(store.get_risk("SSN"), RiskLevel::High);
    assert_eq!(store.effective_level("Teller", "SSN").0, MaskLevel::PartialLast4);
}

/// Validates that a malformed policy is fatal.
///
/// # Test Steps
/// 1. Write a policy with an unknown risk level
/// 2. Verify loading yields `MaskError::Config`
#[test]
fn test_malformed_policy_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("policy.json");
    fs::write(&path, r#"{ "policy": {}, "riskByType": { "SSN": "EXTREME" } }"#)
        .expect("write policy");

    let err = config::load_policy(&path).unwrap_err();
    assert!(matches!(err, MaskError::Config(_)));
    assert!(err.to_string().contains("invalid policy document"));
}
