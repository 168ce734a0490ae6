//! Integration tests for the Gemini suggestion provider
//!
//! Runs the HTTP provider inside a suggestion chain and masking service
//! against a mock Gemini endpoint.

use std::sync::Arc;
use std::time::Duration;

use complimask_core::{
    DecisionEngine, DecisionKeyer, MaskingService, PatternRegistry, PolicyStore, SuggestionChain,
};
use complimask_domain::{DecisionSource, MaskLevel, MaskRequest};
use complimask_infra::{GeminiClient, HttpClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

const POLICY: &str = r#"{
    "roles": ["Teller"],
    "policy": { "Teller": { "EMAIL": "PARTIAL_LAST4", "SSN": "NONE" } },
    "riskByType": { "SSN": "HIGH", "EMAIL": "LOW" }
}"#;

fn gemini(server: &MockServer) -> Arc<GeminiClient> {
    let http_client = HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("http client");
    Arc::new(GeminiClient::new("test-api-key", http_client).with_base_url(server.uri()))
}

fn service(server: &MockServer, timeout: Duration) -> MaskingService {
    let policy = Arc::new(PolicyStore::from_json(POLICY).expect("policy"));
    let engine = DecisionEngine::new(policy, Arc::new(PatternRegistry::with_builtins()));
    let keyer = DecisionKeyer::new(Some("gemini-salt"), "sha256").expect("keyer");
    let chain = SuggestionChain::new(timeout, Duration::from_secs(300))
        .and_then(|chain| chain.with_provider(gemini(server)))
        .expect("chain");
    MaskingService::new(engine, keyer).with_suggestions(chain)
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
}

/// Validates that a stricter model suggestion is applied.
///
/// # Test Steps
/// 1. Mock Gemini replying `MASK_ALL`
/// 2. Mask an email for a Teller whose policy is `PARTIAL_LAST4`
/// 3. Verify the stricter level wins with source AI
#[tokio::test]
async fn test_stricter_suggestion_applied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(reply("MASK_ALL"))
        .expect(1)
        .mount(&server)
        .await;

    let service = service(&server, Duration::from_secs(2));
    let response = service
        .mask(&MaskRequest::new("jane@example.com", "EMAIL", "Teller"))
        .await
        .expect("mask");

    assert_eq!(response.result.level, MaskLevel::MaskAll);
    assert_eq!(response.result.source, DecisionSource::Ai);
    assert!(!response.result.masked.contains("jane"));
}

/// Validates that a more permissive model suggestion is clamped.
///
/// # Test Steps
/// 1. Mock Gemini replying `FULL`
/// 2. Mask an SSN for a Teller whose policy is `NONE` on HIGH risk data
/// 3. Verify the risk cap holds and the raw value is not revealed
#[tokio::test]
async fn test_permissive_suggestion_clamped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(reply("FULL"))
        .mount(&server)
        .await;

    let service = service(&server, Duration::from_secs(2));
    let response =
        service.mask(&MaskRequest::new("123-45-6789", "SSN", "Teller")).await.expect("mask");

    assert_eq!(response.result.level, MaskLevel::PartialLast4);
    assert_eq!(response.result.masked, "***-**-6789");
}

/// Validates that an upstream failure opens the provider circuit.
///
/// # Test Steps
/// 1. Mock Gemini failing with 500
/// 2. Mask two different values
/// 3. Verify the policy level is used and Gemini was called once
/// 4. Verify health reports the open circuit as degraded
#[tokio::test]
async fn test_failure_opens_circuit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let service = service(&server, Duration::from_secs(2));
    for value in ["a@example.com", "b@example.com"] {
        let response =
            service.mask(&MaskRequest::new(value, "EMAIL", "Teller")).await.expect("mask");
        assert_eq!(response.result.level, MaskLevel::PartialLast4);
        assert_eq!(response.result.source, DecisionSource::Policy);
    }

    let health = service.health();
    assert_eq!(health.providers.len(), 1);
    assert_eq!(health.providers[0].name, "gemini");
    assert_eq!(health.providers[0].circuit, "OPEN");
}

/// Validates that a slow model is abandoned after the call budget.
///
/// # Test Steps
/// 1. Mock Gemini replying after one second
/// 2. Mask with a 100 ms budget
/// 3. Verify the policy decision is returned well before the reply
#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(reply("MASK_ALL").set_delay(Duration::from_secs(1)))
        .mount(&server)
        .await;

    let service = service(&server, Duration::from_millis(100));
    let started = std::time::Instant::now();
    let response = service
        .mask(&MaskRequest::new("jane@example.com", "EMAIL", "Teller"))
        .await
        .expect("mask");

    assert!(started.elapsed() < Duration::from_millis(900));
    assert_eq!(response.result.source, DecisionSource::Policy);
    assert_eq!(response.result.level, MaskLevel::PartialLast4);
}
