//! Service metrics
//!
//! Prometheus counters for command executions and decision outcomes, kept
//! in a per-context [`Registry`] and exported by the `metrics` command.
//! Cache and provider gauges are sampled at export time. Counters reset on
//! restart.

use std::fmt;
use std::time::Duration;

use complimask_common::CacheStats;
use complimask_domain::{DecisionSource, HealthReport, MaskResponse};
use prometheus::{IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "complimask";

const SOURCES: [DecisionSource; 4] =
    [DecisionSource::Policy, DecisionSource::Ai, DecisionSource::Custom, DecisionSource::Fallback];

fn opts(name: &str, help: &str) -> Opts {
    Opts::new(name, help).namespace(NAMESPACE)
}

/// Counters for the command surface and the decision path
#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Registry,

    command_calls: IntCounterVec,
    command_failures: IntCounterVec,
    command_duration_ms: IntCounterVec,

    decisions: IntCounterVec,
    decisions_cached: IntCounter,
    unmask: IntCounterVec,

    cache_entries: IntGauge,
    cache_hits: IntGauge,
    cache_misses: IntGauge,
    cache_evictions: IntGauge,
    provider_circuit_open: IntGaugeVec,
}

impl ServiceMetrics {
    /// Create the collectors and register them with a fresh registry.
    ///
    /// # Errors
    /// Returns `prometheus::Error` if a collector fails to register.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let command_calls = IntCounterVec::new(
            opts("command_calls_total", "Command executions."),
            &["command"],
        )?;
        registry.register(Box::new(command_calls.clone()))?;

        let command_failures = IntCounterVec::new(
            opts("command_failures_total", "Command executions that returned an error."),
            &["command"],
        )?;
        registry.register(Box::new(command_failures.clone()))?;

        let command_duration_ms = IntCounterVec::new(
            opts("command_duration_ms_total", "Cumulative command time in milliseconds."),
            &["command"],
        )?;
        registry.register(Box::new(command_duration_ms.clone()))?;

        let decisions =
            IntCounterVec::new(opts("decisions_total", "Mask decisions by source."), &["source"])?;
        registry.register(Box::new(decisions.clone()))?;

        let decisions_cached =
            IntCounter::with_opts(opts("decisions_cached_total", "Decisions served from cache."))?;
        registry.register(Box::new(decisions_cached.clone()))?;

        let unmask =
            IntCounterVec::new(opts("unmask_total", "Unmask checks by outcome."), &["outcome"])?;
        registry.register(Box::new(unmask.clone()))?;

        let cache_entries = IntGauge::with_opts(opts("cache_entries", "Cached decisions."))?;
        registry.register(Box::new(cache_entries.clone()))?;

        let cache_hits = IntGauge::with_opts(opts("cache_hits_total", "Decision cache hits."))?;
        registry.register(Box::new(cache_hits.clone()))?;

        let cache_misses =
            IntGauge::with_opts(opts("cache_misses_total", "Decision cache misses."))?;
        registry.register(Box::new(cache_misses.clone()))?;

        let cache_evictions = IntGauge::with_opts(opts(
            "cache_evictions_total",
            "Decisions evicted to make room.",
        ))?;
        registry.register(Box::new(cache_evictions.clone()))?;

        let provider_circuit_open = IntGaugeVec::new(
            opts("provider_circuit_open", "Provider short-circuited (1) or closed (0)."),
            &["provider"],
        )?;
        registry.register(Box::new(provider_circuit_open.clone()))?;

        for source in SOURCES {
            decisions.with_label_values(&[&source.to_string()]);
        }
        for outcome in ["allowed", "denied"] {
            unmask.with_label_values(&[outcome]);
        }

        Ok(Self {
            registry,
            command_calls,
            command_failures,
            command_duration_ms,
            decisions,
            decisions_cached,
            unmask,
            cache_entries,
            cache_hits,
            cache_misses,
            cache_evictions,
            provider_circuit_open,
        })
    }

    /// Record one command execution.
    pub fn record_command(&self, command: &str, elapsed: Duration, success: bool) {
        self.command_calls.with_label_values(&[command]).inc();
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.command_duration_ms.with_label_values(&[command]).inc_by(millis);
        if !success {
            self.command_failures.with_label_values(&[command]).inc();
        }
    }

    /// Record the decision behind a mask reply.
    pub fn record_decision(&self, response: &MaskResponse) {
        if response.cached {
            self.decisions_cached.inc();
        }
        self.decisions.with_label_values(&[&response.result.source.to_string()]).inc();
    }

    /// Count an unmask check by outcome.
    pub fn record_unmask(&self, allowed: bool) {
        let outcome = if allowed { "allowed" } else { "denied" };
        self.unmask.with_label_values(&[outcome]).inc();
    }

    /// Calls recorded for `command`.
    pub fn command_calls(&self, command: &str) -> u64 {
        self.command_calls.with_label_values(&[command]).get()
    }

    /// Degraded fallback decisions served so far.
    pub fn fallback_count(&self) -> u64 {
        self.decisions.with_label_values(&[&DecisionSource::Fallback.to_string()]).get()
    }

    /// Sample the cache and provider gauges, then encode the registry in the
    /// Prometheus text format.
    ///
    /// # Errors
    /// Returns `prometheus::Error` if encoding fails.
    pub fn render_prometheus(
        &self,
        health: &HealthReport,
        cache: Option<&CacheStats>,
    ) -> prometheus::Result<String> {
        if let Some(stats) = cache {
            self.cache_entries.set(saturating_i64(stats.size));
            self.cache_hits.set(saturating_i64(stats.hits));
            self.cache_misses.set(saturating_i64(stats.misses));
            self.cache_evictions.set(saturating_i64(stats.evictions));
        }

        self.provider_circuit_open.reset();
        for provider in &health.providers {
            let open = i64::from(provider.circuit != "CLOSED");
            self.provider_circuit_open.with_label_values(&[&provider.name]).set(open);
        }

        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

impl fmt::Debug for ServiceMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMetrics")
            .field("collectors", &self.registry.gather().len())
            .finish_non_exhaustive()
    }
}

fn saturating_i64<T: TryInto<i64>>(value: T) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}
