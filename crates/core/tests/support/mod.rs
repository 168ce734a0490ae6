//! Shared test helpers for `complimask-core` integration tests.
//!
//! Provides a reference policy plus call-counting mocks for the suggestion
//! and cache ports.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use complimask_core::{
    DecisionEngine, DecisionKeyer, MaskingService, PatternRegistry, PolicyStore, Suggestion,
    SuggestionChain, SuggestionProvider,
};
use complimask_domain::{DecideResult, MaskError, MaskLevel, Result as DomainResult};

pub const POLICY: &str = r#"{
    "roles": ["Administrator", "Regional Manager", "Manager", "Teller", "Supervisor"],
    "policy": {
        "Administrator": { "SSN": "FULL", "EMAIL": "FULL", "PHONE": "FULL", "CREDIT_CARD": "FULL" },
        "Manager": { "SSN": "PARTIAL_LAST4", "EMAIL": "NONE", "PHONE": "NONE" },
        "Teller": {
            "SSN": "NONE",
            "EMAIL": "PARTIAL_LAST4",
            "PHONE": "PARTIAL_LAST4",
            "CREDIT_CARD": "PARTIAL_LAST4"
        },
        "Supervisor": { "SSN": "MASK_ALL" }
    },
    "riskByType": { "SSN": "HIGH", "CREDIT_CARD": "HIGH", "PHONE": "MEDIUM", "EMAIL": "LOW" }
}"#;

pub fn policy() -> Arc<PolicyStore> {
    Arc::new(PolicyStore::from_json(POLICY).expect("reference policy parses"))
}

pub fn engine() -> DecisionEngine {
    DecisionEngine::new(policy(), Arc::new(PatternRegistry::with_builtins()))
}

pub fn keyer() -> DecisionKeyer {
    DecisionKeyer::new(Some("integration-salt"), "sha256").expect("valid keyer")
}

pub fn service() -> MaskingService {
    MaskingService::new(engine(), keyer())
}

/// Chain with a 100 ms budget and a five minute cool-down.
pub fn chain() -> SuggestionChain {
    SuggestionChain::new(Duration::from_millis(100), Duration::from_secs(300))
        .expect("valid chain config")
}

/// Provider that always returns the same level and counts its calls.
pub struct CountingProvider {
    level: Option<MaskLevel>,
    calls: AtomicU32,
}

impl CountingProvider {
    pub fn new(level: Option<MaskLevel>) -> Arc<Self> {
        Arc::new(Self { level, calls: AtomicU32::new(0) })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn suggest(&self, _: &str, _: &str, _: &str) -> DomainResult<Option<Suggestion>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.level.map(Suggestion::Single))
    }
}

/// Cache backend whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl complimask_core::DecisionStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn get(&self, _: &str) -> DomainResult<Option<DecideResult>> {
        Err(MaskError::Cache("backend unavailable".to_string()))
    }

    async fn set(&self, _: &str, _: &DecideResult, _: Option<Duration>) -> DomainResult<()> {
        Err(MaskError::Cache("backend unavailable".to_string()))
    }

    async fn delete(&self, _: &str) -> DomainResult<bool> {
        Err(MaskError::Cache("backend unavailable".to_string()))
    }

    async fn clear(&self) -> DomainResult<()> {
        Err(MaskError::Cache("backend unavailable".to_string()))
    }
}
