//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use complimask_common::CacheStats;
use complimask_core::{
    CacheSweeper, DataTypeDetector, DecisionEngine, DecisionKeyer, DecisionStore, MaskingService,
    PatternRegistry, PolicyStore, ResultCache, StaticRuleProvider, SuggestionChain,
};
use complimask_domain::{HealthReport, MaskError, Result, ServiceConfig};
use complimask_infra::{config, GeminiClient};
use tracing::{info, warn};

use crate::utils::metrics::ServiceMetrics;

/// Application context - holds all services and dependencies
///
/// Built once at startup. A malformed policy or invalid configuration is a
/// `MaskError::Config` and the process should not start.
pub struct AppContext {
    pub config: ServiceConfig,
    pub service: Arc<MaskingService>,
    pub detector: Arc<DataTypeDetector>,
    pub metrics: Arc<ServiceMetrics>,
    cache: Option<Arc<ResultCache>>,
    sweeper: Option<CacheSweeper>,
}

impl AppContext {
    /// Create a context from environment variables or a probed config file
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    /// Create a context from an explicit configuration, loading the policy
    /// document it names
    pub fn new_with_config(service_config: ServiceConfig) -> Result<Self> {
        let policy = config::load_policy(&service_config.policy_path)?;
        Self::with_policy(service_config, policy)
    }

    /// Wire every component around an already-loaded policy
    ///
    /// The cache sweeper only starts when called inside a Tokio runtime.
    pub fn with_policy(service_config: ServiceConfig, policy: PolicyStore) -> Result<Self> {
        let patterns = Arc::new(PatternRegistry::with_builtins());
        let engine = DecisionEngine::new(Arc::new(policy), patterns);

        let keyer = DecisionKeyer::new(
            service_config.cache.salt.as_deref(),
            &service_config.cache.hash_algorithm,
        )?;

        let mut service = MaskingService::new(engine, keyer);

        if let Some(chain) = build_suggestion_chain(&service_config)? {
            info!(providers = ?chain.provider_names(), "suggestion chain enabled");
            service = service.with_suggestions(chain);
        }

        let mut cache = None;
        let mut sweeper = None;
        if service_config.cache.enabled {
            let ttl = Duration::from_millis(service_config.cache.ttl_ms);
            let store = Arc::new(ResultCache::new(ttl, service_config.cache.max_size));
            sweeper = CacheSweeper::spawn(
                Arc::clone(&store),
                Duration::from_millis(service_config.cache.sweep_interval_ms),
            );
            service = service.with_store(Arc::clone(&store) as Arc<dyn DecisionStore>, Some(ttl));
            info!(
                ttl_ms = service_config.cache.ttl_ms,
                max_size = service_config.cache.max_size,
                sweeper = sweeper.is_some(),
                "decision cache enabled"
            );
            cache = Some(store);
        }

        let detector = Arc::new(DataTypeDetector::with_builtins()?);
        let metrics = ServiceMetrics::new()
            .map_err(|err| MaskError::Internal(format!("metrics registry: {err}")))?;

        Ok(Self {
            config: service_config,
            service: Arc::new(service),
            detector,
            metrics: Arc::new(metrics),
            cache,
            sweeper,
        })
    }

    /// Current health report from the masking service.
    pub fn health_check(&self) -> HealthReport {
        self.service.health()
    }

    /// Decision cache counters, or `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Stop background tasks. Dropping the context has the same effect.
    pub fn shutdown(&self) {
        info!("shutdown called on AppContext");
        if let Some(sweeper) = &self.sweeper {
            sweeper.stop();
            info!(component = "CacheSweeper", cleanup_method = "abort", "background_task_cleanup");
        }
    }
}

/// Static rules first, then the Gemini provider when a key is configured.
fn build_suggestion_chain(service_config: &ServiceConfig) -> Result<Option<SuggestionChain>> {
    let settings = &service_config.suggestion;
    if !settings.enabled {
        info!("suggestion chain disabled by configuration");
        return Ok(None);
    }

    let timeout = Duration::from_millis(settings.timeout_ms);
    let mut chain = SuggestionChain::new(timeout, Duration::from_secs(settings.cooldown_secs))
        .map_err(|err| MaskError::Config(format!("suggestion chain: {err}")))?;

    if !settings.static_rules.is_empty() {
        let provider = StaticRuleProvider::new(settings.static_rules.clone());
        chain
            .push(Arc::new(provider))
            .map_err(|err| MaskError::Config(format!("suggestion chain: {err}")))?;
    }

    match &service_config.gemini {
        Some(gemini) => {
            let client = GeminiClient::from_settings(gemini, timeout)
                .map_err(|err| MaskError::Config(format!("gemini provider: {err}")))?;
            info!(model = client.model(), "Gemini suggestion provider configured");
            chain
                .push(Arc::new(client))
                .map_err(|err| MaskError::Config(format!("suggestion chain: {err}")))?;
        }
        None => warn!("GOOGLE_API_KEY not set; Gemini suggestions disabled"),
    }

    Ok(if chain.is_empty() { None } else { Some(chain) })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use complimask_domain::{GeminiSettings, MaskLevel};

    use super::*;

    fn policy() -> PolicyStore {
        PolicyStore::from_json(
            r#"{ "roles": ["Teller"], "policy": { "Teller": { "SSN": "NONE" } },
                 "riskByType": { "SSN": "HIGH" } }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_with_policy_wires_cache_and_sweeper() {
        let mut service_config = ServiceConfig::new("unused.json");
        service_config.cache.salt = Some("ctx-salt".into());

        let ctx = AppContext::with_policy(service_config, policy()).unwrap();
        assert!(ctx.cache_stats().is_some());
        assert!(ctx.sweeper.is_some());
        assert!(ctx.service.suggestions().is_none());
        assert_eq!(ctx.service.info().cache_provider, "memory");

        ctx.shutdown();
    }

    #[test]
    fn test_cache_disabled() {
        let mut service_config = ServiceConfig::new("unused.json");
        service_config.cache.enabled = false;

        let ctx = AppContext::with_policy(service_config, policy()).unwrap();
        assert!(ctx.cache_stats().is_none());
        assert_eq!(ctx.service.info().cache_provider, "disabled");
    }

    #[test]
    fn test_chain_order_static_then_gemini() {
        let mut service_config = ServiceConfig::new("unused.json");
        service_config.suggestion.static_rules =
            BTreeMap::from([("SSN".to_string(), MaskLevel::MaskAll)]);
        service_config.gemini = Some(GeminiSettings::new("key"));

        let chain = build_suggestion_chain(&service_config).unwrap().expect("chain");
        assert_eq!(chain.provider_names(), vec!["static-rules", "gemini"]);
    }

    #[test]
    fn test_invalid_settings_are_config_errors() {
        let mut service_config = ServiceConfig::new("unused.json");
        service_config.gemini = Some(GeminiSettings::new(""));
        assert!(matches!(
            AppContext::with_policy(service_config, policy()),
            Err(MaskError::Config(_))
        ));

        let mut service_config = ServiceConfig::new("unused.json");
        service_config.cache.hash_algorithm = "md5".into();
        assert!(matches!(
            AppContext::with_policy(service_config, policy()),
            Err(MaskError::Config(_))
        ));

        let mut service_config = ServiceConfig::new("unused.json");
        service_config.suggestion.static_rules =
            BTreeMap::from([("SSN".to_string(), MaskLevel::MaskAll)]);
        service_config.suggestion.cooldown_secs = 0;
        assert!(matches!(
            AppContext::with_policy(service_config, policy()),
            Err(MaskError::Config(_))
        ));
    }

    #[test]
    fn test_missing_policy_file_is_fatal() {
        let result = AppContext::new_with_config(ServiceConfig::new("/nonexistent/policy.json"));
        assert!(matches!(result, Err(MaskError::Config(_))));
    }
}
