//! Ordered suggestion providers behind per-provider circuit breakers

use std::sync::Arc;
use std::time::Duration;

use complimask_common::resilience::{
    CircuitBreaker, CircuitBreakerConfig, Clock, ConfigResult, ResilienceError, SystemClock,
};
use complimask_domain::ProviderHealth;
use tracing::{debug, instrument, warn};

use super::ports::{Suggestion, SuggestionProvider};

struct GuardedProvider<C: Clock> {
    provider: Arc<dyn SuggestionProvider>,
    breaker: CircuitBreaker<C>,
}

/// Queries providers in order and returns the first suggestion.
///
/// Each call races the provider against `timeout`; the losing future is
/// dropped, which cancels providers built on cancellation-aware I/O. A
/// provider that errors or times out opens its breaker and is skipped until
/// the cool-down elapses, after which one probe call is admitted.
pub struct SuggestionChain<C: Clock + Clone = SystemClock> {
    providers: Vec<GuardedProvider<C>>,
    timeout: Duration,
    breaker_config: CircuitBreakerConfig,
    clock: C,
}

impl SuggestionChain<SystemClock> {
    /// Chain whose breakers open on one failure and stay open for `cooldown`.
    ///
    /// # Errors
    /// Returns `ConfigError` if `cooldown` is zero.
    pub fn new(timeout: Duration, cooldown: Duration) -> ConfigResult<Self> {
        Self::with_clock(timeout, CircuitBreakerConfig::single_failure(cooldown), SystemClock)
    }
}

impl<C: Clock + Clone> SuggestionChain<C> {
    /// Empty chain whose breakers use `breaker_config` and `clock`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the breaker configuration is invalid.
    pub fn with_clock(
        timeout: Duration,
        breaker_config: CircuitBreakerConfig,
        clock: C,
    ) -> ConfigResult<Self> {
        breaker_config.validate()?;
        Ok(Self { providers: Vec::new(), timeout, breaker_config, clock })
    }

    /// Append a provider with its own breaker.
    ///
    /// # Errors
    /// Returns `ConfigError` if the breaker configuration is invalid.
    pub fn push(&mut self, provider: Arc<dyn SuggestionProvider>) -> ConfigResult<()> {
        let breaker = CircuitBreaker::with_clock(self.breaker_config.clone(), self.clock.clone())?;
        debug!(provider = provider.name(), "registered suggestion provider");
        self.providers.push(GuardedProvider { provider, breaker });
        Ok(())
    }

    /// Builder form of [`push`](Self::push).
    ///
    /// # Errors
    /// Returns `ConfigError` if the breaker configuration is invalid.
    pub fn with_provider(mut self, provider: Arc<dyn SuggestionProvider>) -> ConfigResult<Self> {
        self.push(provider)?;
        Ok(self)
    }

    /// First suggestion any provider returns, or `None`.
    ///
    /// Never fails: provider errors, timeouts and open circuits all count as
    /// "no suggestion". Empty rankings are skipped.
    #[instrument(skip(self, value), fields(providers = self.providers.len()))]
    pub async fn suggest(&self, value: &str, data_type: &str, role: &str) -> Option<Suggestion> {
        for guarded in &self.providers {
            let name = guarded.provider.name();
            let outcome = guarded
                .breaker
                .execute_with_timeout(self.timeout, || {
                    guarded.provider.suggest(value, data_type, role)
                })
                .await;

            match outcome {
                Ok(Some(suggestion)) if suggestion.primary().is_some() => {
                    debug!(provider = name, "suggestion received");
                    return Some(suggestion);
                }
                Ok(_) => debug!(provider = name, "provider deferred"),
                Err(ResilienceError::CircuitOpen) => {
                    debug!(provider = name, "provider short-circuited");
                }
                Err(ResilienceError::Timeout { timeout }) => {
                    warn!(provider = name, timeout = ?timeout, "suggestion timed out");
                }
                Err(ResilienceError::OperationFailed { source }) => {
                    warn!(provider = name, error = %source, "suggestion provider failed");
                }
            }
        }
        None
    }

    /// Per-provider call budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in chain order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|g| g.provider.name().to_string()).collect()
    }

    /// Breaker state per provider, in chain order.
    pub fn provider_health(&self) -> Vec<ProviderHealth> {
        self.providers
            .iter()
            .map(|g| {
                let metrics = g.breaker.metrics();
                ProviderHealth {
                    name: g.provider.name().to_string(),
                    circuit: metrics.state.to_string(),
                    failures: metrics.failure_count,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for suggestion::chain.
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use complimask_common::resilience::{CircuitState, MockClock};
    use complimask_domain::{MaskError, MaskLevel, Result};

    use super::*;

    enum Behaviour {
        Returns(Option<Suggestion>),
        Fails,
        Sleeps(Duration),
    }

    struct TestProvider {
        name: &'static str,
        behaviour: Behaviour,
        calls: AtomicU32,
    }

    impl TestProvider {
        fn new(name: &'static str, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self { name, behaviour, calls: AtomicU32::new(0) })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SuggestionProvider for TestProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn suggest(&self, _: &str, _: &str, _: &str) -> Result<Option<Suggestion>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Returns(s) => Ok(s.clone()),
                Behaviour::Fails => Err(MaskError::provider(self.name, "boom")),
                Behaviour::Sleeps(d) => {
                    tokio::time::sleep(*d).await;
                    Ok(Some(Suggestion::Single(MaskLevel::Full)))
                }
            }
        }
    }

    fn chain(clock: MockClock) -> SuggestionChain<MockClock> {
        SuggestionChain::with_clock(
            Duration::from_millis(50),
            CircuitBreakerConfig::single_failure(Duration::from_secs(300)),
            clock,
        )
        .unwrap()
    }

    /// Validates provider ordering.
    ///
    /// Assertions:
    /// - Confirms deferring and failing providers fall through to the next.
    /// - Confirms providers after the first answer are not called.
    #[tokio::test]
    async fn test_first_answer_wins() {
        let failing = TestProvider::new("failing", Behaviour::Fails);
        let deferring = TestProvider::new("deferring", Behaviour::Returns(None));
        let answering =
            TestProvider::new("answering", Behaviour::Returns(Some(MaskLevel::MaskAll.into())));
        let unused = TestProvider::new("unused", Behaviour::Returns(Some(MaskLevel::Full.into())));

        let chain = chain(MockClock::new())
            .with_provider(failing.clone())
            .unwrap()
            .with_provider(deferring.clone())
            .unwrap()
            .with_provider(answering.clone())
            .unwrap()
            .with_provider(unused.clone())
            .unwrap();

        let suggestion = chain.suggest("v", "SSN", "Teller").await;
        assert_eq!(suggestion, Some(Suggestion::Single(MaskLevel::MaskAll)));
        assert_eq!(failing.calls(), 1);
        assert_eq!(deferring.calls(), 1);
        assert_eq!(unused.calls(), 0);
    }

    /// Validates the breaker cool-down.
    ///
    /// Assertions:
    /// - Confirms a failed provider is skipped without being called.
    /// - Confirms one probe is admitted after the cool-down.
    #[tokio::test]
    async fn test_failed_provider_short_circuits_until_cooldown() {
        let clock = MockClock::new();
        let failing = TestProvider::new("failing", Behaviour::Fails);
        let chain = chain(clock.clone()).with_provider(failing.clone()).unwrap();

        assert_eq!(chain.suggest("v", "SSN", "Teller").await, None);
        assert_eq!(chain.provider_health()[0].circuit, CircuitState::Open.to_string());

        clock.advance(Duration::from_secs(299));
        assert_eq!(chain.suggest("v", "SSN", "Teller").await, None);
        assert_eq!(failing.calls(), 1);

        clock.advance(Duration::from_secs(1));
        assert_eq!(chain.suggest("v", "SSN", "Teller").await, None);
        assert_eq!(failing.calls(), 2);
    }

    /// Validates the call budget.
    ///
    /// Assertions:
    /// - Confirms a slow provider yields no suggestion and opens its breaker.
    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let slow = TestProvider::new("slow", Behaviour::Sleeps(Duration::from_millis(500)));
        let chain = chain(MockClock::new()).with_provider(slow.clone()).unwrap();

        assert_eq!(chain.suggest("v", "SSN", "Teller").await, None);
        let health = chain.provider_health();
        assert_eq!(health[0].name, "slow");
        assert_eq!(health[0].circuit, "OPEN");
    }

    /// Validates empty rankings.
    ///
    /// Assertions:
    /// - Confirms an empty ranking defers to the next provider.
    #[tokio::test]
    async fn test_empty_ranking_is_skipped() {
        let empty =
            TestProvider::new("empty", Behaviour::Returns(Some(Suggestion::Ranked(vec![]))));
        let ranked = TestProvider::new(
            "ranked",
            Behaviour::Returns(Some(Suggestion::Ranked(vec![MaskLevel::PartialLast3]))),
        );
        let chain = chain(MockClock::new())
            .with_provider(empty)
            .unwrap()
            .with_provider(ranked)
            .unwrap();

        let suggestion = chain.suggest("v", "EMAIL", "Teller").await.unwrap();
        assert_eq!(suggestion.primary(), Some(MaskLevel::PartialLast3));
        assert_eq!(chain.provider_names(), vec!["empty", "ranked"]);
    }
}
