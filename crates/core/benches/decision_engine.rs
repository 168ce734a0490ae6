use std::sync::Arc;
use std::time::Duration;

use complimask_core::{
    DecisionEngine, DecisionKeyer, MaskingService, PatternRegistry, PolicyStore, ResultCache,
};
use complimask_domain::{MaskLevel, MaskRequest};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const POLICY: &str = r#"{
    "roles": ["Administrator", "Teller"],
    "policy": {
        "Administrator": { "SSN": "FULL", "CREDIT_CARD": "FULL" },
        "Teller": { "SSN": "NONE", "EMAIL": "PARTIAL_LAST4", "CREDIT_CARD": "PARTIAL_LAST4" }
    },
    "riskByType": { "SSN": "HIGH", "CREDIT_CARD": "HIGH", "EMAIL": "LOW" }
}"#;

fn engine() -> DecisionEngine {
    DecisionEngine::new(
        Arc::new(PolicyStore::from_json(POLICY).unwrap()),
        Arc::new(PatternRegistry::with_builtins()),
    )
}

fn bench_decide(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("decide");

    group.bench_function("policy_ssn", |b| {
        b.iter(|| engine.decide(black_box("123-45-6789"), "Administrator", "SSN", None).unwrap())
    });
    group.bench_function("suggested_card", |b| {
        b.iter(|| {
            engine
                .decide(
                    black_box("4111111111111111"),
                    "Teller",
                    "CREDIT_CARD",
                    Some(MaskLevel::PartialLast4),
                )
                .unwrap()
        })
    });
    group.finish();
}

fn bench_cached_service(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let service: MaskingService =
        MaskingService::new(engine(), DecisionKeyer::new(Some("bench"), "sha256").unwrap())
            .with_store(Arc::new(ResultCache::new(Duration::from_secs(3600), 1000)), None);
    let request = MaskRequest::new("user@example.com", "EMAIL", "Teller");

    c.bench_function("service_cache_hit", |b| {
        b.to_async(&runtime).iter(|| async { service.mask(black_box(&request)).await.unwrap() })
    });
}

criterion_group!(benches, bench_decide, bench_cached_service);
criterion_main!(benches);
