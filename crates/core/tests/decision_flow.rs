//! Integration tests for the masking decision path
//!
//! Exercises the service end to end: cache lookups, the suggestion chain,
//! the engine and the fallback on internal failure.

mod support;

use std::sync::Arc;
use std::time::Duration;

use complimask_core::{DecisionEngine, MaskingService, PatternRegistry, ResultCache};
use complimask_domain::{DecisionSource, HealthStatus, MaskError, MaskLevel, MaskRequest};
use serde_json::json;
use support::{BrokenStore, CountingProvider};

/// Validates cache transparency.
///
/// # Test Steps
/// 1. Build a service with a counting provider and an in-memory store
/// 2. Mask the same request twice
/// 3. Verify the second response is cached, identical, and skipped the chain
#[tokio::test]
async fn test_second_identical_request_is_cached() {
    let provider = CountingProvider::new(Some(MaskLevel::MaskAll));
    let store = Arc::new(ResultCache::new(Duration::from_secs(3600), 1000));
    let service = support::service()
        .with_suggestions(support::chain().with_provider(provider.clone()).unwrap())
        .with_store(store.clone(), Some(Duration::from_secs(3600)));

    let request = MaskRequest::new("555-123-4567", "PHONE", "Teller");
    let first = service.mask(&request).await.unwrap();
    let second = service.mask(&request).await.unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.result.masked, second.result.masked);
    assert_eq!(first.result.level, second.result.level);
    assert_eq!(provider.calls(), 1);
    assert_eq!(store.len(), 1);

    let other_role = MaskRequest::new("555-123-4567", "PHONE", "Manager");
    assert!(!service.mask(&other_role).await.unwrap().cached);
    assert_eq!(provider.calls(), 2);
}

/// Validates that a failing cache backend is only a miss.
///
/// # Test Steps
/// 1. Wire a store whose get and set always fail
/// 2. Mask a value twice
/// 3. Verify both calls succeed uncached with the policy decision
#[tokio::test]
async fn test_cache_failures_are_misses() {
    let service = support::service().with_store(Arc::new(BrokenStore), None);
    let request = MaskRequest::new("123-45-6789", "SSN", "Teller");

    for _ in 0..2 {
        let response = service.mask(&request).await.unwrap();
        assert!(!response.cached);
        assert!(!response.degraded);
        assert_eq!(response.result.masked, "***-**-6789");
    }
    assert!(matches!(service.clear_cache().await, Err(MaskError::Cache(_))));
}

/// Validates the conservative fallback.
///
/// # Test Steps
/// 1. Build an engine with an empty pattern registry
/// 2. Mask a value
/// 3. Verify the fallback decision is returned, degraded, and never cached
#[tokio::test]
async fn test_internal_failure_returns_fallback() {
    let engine = DecisionEngine::new(support::policy(), Arc::new(PatternRegistry::new()));
    let store = Arc::new(ResultCache::new(Duration::from_secs(60), 10));
    let service: MaskingService =
        MaskingService::new(engine, support::keyer()).with_store(store.clone(), None);

    let response = service.mask(&MaskRequest::new("123-45-6789", "SSN", "Teller")).await.unwrap();

    assert!(response.degraded);
    assert_eq!(response.result.masked, "***");
    assert_eq!(response.result.level, MaskLevel::MaskAll);
    assert_eq!(response.result.reason, "fallback due to error");
    assert_eq!(response.result.source, DecisionSource::Fallback);
    assert!(store.is_empty());
    assert_eq!(service.health().status, HealthStatus::Unhealthy);
}

/// Validates request validation from raw JSON.
///
/// # Test Steps
/// 1. Submit bodies with a missing and a non-string value
/// 2. Verify both are validation errors
/// 3. Submit a valid body with a custom regex and verify the custom decision
#[tokio::test]
async fn test_json_validation_and_custom_rules() {
    let service = support::service();

    let missing = service.mask_json(&json!({ "dataType": "SSN", "role": "Teller" })).await;
    assert!(matches!(missing, Err(MaskError::Validation { ref field, .. }) if field == "value"));

    let wrong_type =
        service.mask_json(&json!({ "value": 123, "dataType": "SSN", "role": "Teller" })).await;
    assert!(matches!(wrong_type, Err(MaskError::Validation { .. })));

    let bad_regex = service
        .mask_json(&json!({
            "value": "x",
            "dataType": "SSN",
            "role": "Teller",
            "customPattern": "("
        }))
        .await;
    assert!(matches!(bad_regex, Err(MaskError::Validation { .. })));

    let custom = service
        .mask_json(&json!({
            "value": "ACCT-1234",
            "dataType": "EMAIL",
            "role": "Administrator",
            "customPattern": "[0-9]"
        }))
        .await
        .unwrap();
    assert_eq!(custom.result.masked, "ACCT-****");
    assert_eq!(custom.result.source, DecisionSource::Custom);
}

/// Validates that request-supplied custom rules cannot exceed the policy.
///
/// # Test Steps
/// 1. Send a regex that matches nothing for a teller's SSN
/// 2. Verify the policy masking still applies
/// 3. Send a `FULL` level override for a role without an EMAIL entry
/// 4. Verify the override is lowered to `MASK_ALL`
#[tokio::test]
async fn test_custom_rules_stay_within_policy() {
    let service = support::service();

    let regex = service
        .mask_json(&json!({
            "value": "123-45-6789",
            "dataType": "SSN",
            "role": "Teller",
            "customPattern": "a^"
        }))
        .await
        .unwrap();
    assert_eq!(regex.result.masked, "***-**-6789");
    assert_eq!(regex.result.level, MaskLevel::CustomRegex);

    let level = service
        .mask_json(&json!({
            "value": "user@example.com",
            "dataType": "EMAIL",
            "role": "Supervisor",
            "customLevel": "FULL"
        }))
        .await
        .unwrap();
    assert_eq!(level.result.level, MaskLevel::MaskAll);
    assert_ne!(level.result.masked, "user@example.com");
    assert_eq!(level.result.source, DecisionSource::Custom);
}

/// Validates the unmask gate through the service.
///
/// # Test Steps
/// 1. Ask to unmask SSN as a teller and as an administrator
/// 2. Verify the teller is denied with a partial level and the admin allowed
#[tokio::test]
async fn test_unmask_through_service() {
    let service = support::service();

    let teller = service
        .unmask_json(&json!({ "recordId": "r-1", "field": "SSN", "role": "Teller" }))
        .unwrap();
    assert!(!teller.allowed);
    assert_eq!(teller.level, MaskLevel::PartialLast4);

    let admin = service
        .unmask_json(&json!({ "recordId": "r-1", "field": "SSN", "role": "Administrator" }))
        .unwrap();
    assert!(admin.allowed);
    assert_eq!(admin.level, MaskLevel::Full);

    assert!(service.unmask_json(&json!({ "recordId": "", "field": "SSN", "role": "x" })).is_err());
}

/// Validates health and discovery reports.
///
/// # Test Steps
/// 1. Build a fully wired service
/// 2. Verify the health report counts policy, patterns and providers
/// 3. Verify the info report lists patterns and the cache backend
#[tokio::test]
async fn test_health_and_info_reports() {
    let service = support::service()
        .with_suggestions(support::chain().with_provider(CountingProvider::new(None)).unwrap())
        .with_store(
            Arc::new(ResultCache::new(Duration::from_secs(3600), 1000)),
            Some(Duration::from_secs(3600)),
        );

    let health = service.health();
    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(health.is_ready());
    assert_eq!(health.policy_roles, 5);
    assert_eq!(health.policy_data_types, 4);
    assert_eq!(health.patterns, 11);
    assert_eq!(health.providers.len(), 1);

    let info = service.info();
    assert_eq!(info.cache_provider, "memory");
    assert_eq!(info.cache_ttl_ms, 3_600_000);
    assert_eq!(info.cache_max_size, 1000);
    assert_eq!(info.suggestion_providers, vec!["counting"]);
    assert!(info.patterns.iter().any(|p| p.id == "CREDIT_CARD_LUHN"));
}

/// Validates concurrent identical requests.
///
/// # Test Steps
/// 1. Issue ten identical requests concurrently against a cached service
/// 2. Verify every response carries the same decision
/// 3. Verify the store holds one entry however many misses were computed
#[tokio::test]
async fn test_concurrent_identical_requests_agree() {
    let provider = CountingProvider::new(Some(MaskLevel::MaskAll));
    let store = Arc::new(ResultCache::new(Duration::from_secs(3600), 1000));
    let service = support::service()
        .with_suggestions(support::chain().with_provider(provider.clone()).unwrap())
        .with_store(store.clone(), None);

    let request = MaskRequest::new("555-123-4567", "PHONE", "Teller");
    let responses = futures::future::join_all((0..10).map(|_| service.mask(&request))).await;

    for response in &responses {
        let response = response.as_ref().unwrap();
        assert_eq!(response.result.masked, "***-***-****");
        assert_eq!(response.result.level, MaskLevel::MaskAll);
        assert_eq!(response.result.source, DecisionSource::Ai);
    }
    assert_eq!(store.len(), 1);
    assert!((1..=10).contains(&provider.calls()));
}
