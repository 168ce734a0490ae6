//! Masking service - orchestrates cache, suggestions and the engine

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use complimask_common::resilience::{Clock, SystemClock};
use complimask_domain::{
    DecideResult, HealthReport, HealthStatus, InfoReport, MaskLevel, MaskRequest, MaskResponse,
    Result, UnmaskDecision, UnmaskRequest,
};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::cache::memory::short_key;
use crate::cache::{DecisionKeyer, DecisionStore};
use crate::engine::{CustomRule, DecisionEngine};
use crate::policy::authorize_unmask;
use crate::suggestion::{Suggestion, SuggestionChain};

pub const SERVICE_NAME: &str = "complimask";
pub const SERVICE_DESCRIPTION: &str = "Role and risk aware masking decisions";
const CACHE_DISABLED: &str = "disabled";

/// Decision path: cache lookup, suggestion chain, engine, cache store.
///
/// Concurrent misses for the same key are not coalesced; each computes and
/// stores its own (identical) decision.
pub struct MaskingService<C: Clock + Clone = SystemClock> {
    engine: DecisionEngine,
    keyer: DecisionKeyer,
    suggestions: Option<SuggestionChain<C>>,
    store: Option<Arc<dyn DecisionStore>>,
    cache_ttl: Option<Duration>,
}

impl<C: Clock + Clone> MaskingService<C> {
    /// Service without suggestions or caching.
    pub fn new(engine: DecisionEngine, keyer: DecisionKeyer) -> Self {
        Self { engine, keyer, suggestions: None, store: None, cache_ttl: None }
    }

    /// Consult `chain` before deciding.
    pub fn with_suggestions(mut self, chain: SuggestionChain<C>) -> Self {
        self.suggestions = Some(chain);
        self
    }

    /// Memoize decisions in `store`; `ttl` of `None` uses the store default.
    pub fn with_store(mut self, store: Arc<dyn DecisionStore>, ttl: Option<Duration>) -> Self {
        self.store = Some(store);
        self.cache_ttl = ttl;
        self
    }

    /// The underlying decision engine.
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Suggestion chain, if configured.
    pub fn suggestions(&self) -> Option<&SuggestionChain<C>> {
        self.suggestions.as_ref()
    }

    /// Validate a raw JSON body and mask it.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` for malformed requests.
    pub async fn mask_json(&self, body: &Value) -> Result<MaskResponse> {
        let request = MaskRequest::from_json(body)?;
        self.mask(&request).await
    }

    /// Mask a validated request.
    ///
    /// Internal failures never surface as errors: they produce the
    /// conservative fallback decision with `degraded` set.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` if a custom pattern does not compile.
    #[instrument(skip(self, request), fields(role = %request.role, data_type = %request.data_type))]
    pub async fn mask(&self, request: &MaskRequest) -> Result<MaskResponse> {
        if let Some(rule) = custom_rule(request)? {
            return Ok(self.finish(self.engine.decide_custom(
                &request.value,
                &request.role,
                &request.data_type,
                &rule,
            )));
        }

        let key = self.keyer.key(&request.data_type, &request.role, &request.value);
        if let Some(cached) = self.lookup(&key).await {
            debug!(key = short_key(&key), "decision served from cache");
            return Ok(MaskResponse::cached(cached));
        }

        let suggested = self.suggest(request).await;
        let decided =
            self.engine.decide(&request.value, &request.role, &request.data_type, suggested);

        let response = self.finish(decided);
        if !response.degraded {
            self.remember(&key, &response.result).await;
        }
        Ok(response)
    }

    /// Authorization gate for revealing a stored field.
    pub fn unmask(&self, request: &UnmaskRequest) -> UnmaskDecision {
        authorize_unmask(self.engine.policy(), request)
    }

    /// Validate a raw JSON body and authorize it.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` for malformed requests.
    pub fn unmask_json(&self, body: &Value) -> Result<UnmaskDecision> {
        Ok(self.unmask(&UnmaskRequest::from_json(body)?))
    }

    /// `Degraded` while any provider circuit is not closed, `Unhealthy` with
    /// no patterns.
    pub fn health(&self) -> HealthReport {
        let providers = self.suggestions.as_ref().map(|c| c.provider_health()).unwrap_or_default();
        let patterns = self.engine.patterns().len();

        let status = if patterns == 0 {
            HealthStatus::Unhealthy
        } else if providers.iter().any(|p| p.circuit != "CLOSED") {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        HealthReport {
            status,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            policy_roles: self.engine.policy().roles().len(),
            policy_data_types: self.engine.policy().data_types().len(),
            patterns,
            cache_entries: self.store.as_ref().and_then(|s| s.len()).unwrap_or(0),
            cache_hit_rate: self.store.as_ref().and_then(|s| s.hit_rate()).unwrap_or(0.0),
            providers,
        }
    }

    /// Roles, data types, patterns and cache settings.
    pub fn info(&self) -> InfoReport {
        let policy = self.engine.policy();
        InfoReport {
            name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: SERVICE_DESCRIPTION.to_string(),
            timestamp: Utc::now(),
            roles: policy.roles().to_vec(),
            data_types: policy.data_types(),
            patterns: self.engine.patterns().list().iter().map(|p| p.info()).collect(),
            cache_provider: self
                .store
                .as_ref()
                .map_or_else(|| CACHE_DISABLED.to_string(), |s| s.name().to_string()),
            cache_ttl_ms: self
                .cache_ttl
                .map_or(0, |ttl| u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)),
            cache_max_size: self.store.as_ref().and_then(|s| s.capacity()).unwrap_or(0),
            suggestion_providers: self
                .suggestions
                .as_ref()
                .map(|chain| chain.provider_names())
                .unwrap_or_default(),
        }
    }

    /// Drop every cached decision.
    ///
    /// # Errors
    /// Returns `MaskError::Cache` if the backend fails.
    pub async fn clear_cache(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.clear().await,
            None => Ok(()),
        }
    }

    fn finish(&self, decided: Result<DecideResult>) -> MaskResponse {
        match decided {
            Ok(result) => MaskResponse::fresh(result),
            Err(err) => {
                error!(error = %err, kind = err.label(), "masking decision failed, using fallback");
                MaskResponse::degraded()
            }
        }
    }

    async fn lookup(&self, key: &str) -> Option<DecideResult> {
        let store = self.store.as_ref()?;
        match store.get(key).await {
            Ok(hit) => hit,
            Err(err) => {
                warn!(error = %err, key = short_key(key), "cache lookup failed; treating as miss");
                None
            }
        }
    }

    async fn remember(&self, key: &str, result: &DecideResult) {
        if let Some(store) = &self.store {
            if let Err(err) = store.set(key, result, self.cache_ttl).await {
                warn!(error = %err, key = short_key(key), "failed to cache decision");
            }
        }
    }

    async fn suggest(&self, request: &MaskRequest) -> Option<MaskLevel> {
        let chain = self.suggestions.as_ref()?;
        let suggestion =
            chain.suggest(&request.value, &request.data_type, &request.role).await?;
        if let Suggestion::Ranked(levels) = &suggestion {
            if levels.len() > 1 {
                debug!(ranked = levels.len(), "ranked suggestion; using the first level");
            }
        }
        suggestion.primary()
    }
}

fn custom_rule(request: &MaskRequest) -> Result<Option<CustomRule>> {
    if let Some(pattern) = &request.custom_pattern {
        return CustomRule::regex(pattern).map(Some);
    }
    Ok(request.custom_level.map(CustomRule::Level))
}
