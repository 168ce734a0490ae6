//! Shared helpers for `complimask-api` integration tests.

#![allow(dead_code)]

use std::fs;

use complimask_api::context::AppContext;
use complimask_domain::ServiceConfig;
use tempfile::TempDir;

pub const POLICY: &str = r#"{
    "roles": ["Administrator", "Manager", "Teller", "Supervisor"],
    "policy": {
        "Administrator": { "SSN": "FULL", "EMAIL": "FULL", "PHONE": "FULL" },
        "Manager": { "SSN": "PARTIAL_LAST4", "EMAIL": "NONE", "PHONE": "NONE" },
        "Teller": { "SSN": "NONE", "EMAIL": "PARTIAL_LAST4", "PHONE": "PARTIAL_LAST4" },
        "Supervisor": { "SSN": "MASK_ALL" }
    },
    "riskByType": { "SSN": "HIGH", "PHONE": "MEDIUM", "EMAIL": "LOW" }
}"#;

/// Context over a fresh policy file with a fixed cache salt and no
/// suggestion providers.
pub struct TestContext {
    pub ctx: AppContext,
    /// Keep temporary directory alive for the lifetime of the context.
    _temp_dir: TempDir,
}

impl std::ops::Deref for TestContext {
    type Target = AppContext;

    fn deref(&self) -> &AppContext {
        &self.ctx
    }
}

pub fn test_config(temp_dir: &TempDir) -> ServiceConfig {
    let policy_path = temp_dir.path().join("policy.json");
    fs::write(&policy_path, POLICY).expect("failed to write policy file");

    let mut config = ServiceConfig::new(policy_path);
    config.cache.salt = Some("api-test-salt".to_string());
    config
}

pub fn setup_with(configure: impl FnOnce(&mut ServiceConfig)) -> TestContext {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let mut config = test_config(&temp_dir);
    configure(&mut config);

    let ctx = AppContext::new_with_config(config).expect("failed to build AppContext");
    TestContext { ctx, _temp_dir: temp_dir }
}

pub fn setup() -> TestContext {
    setup_with(|_| {})
}
