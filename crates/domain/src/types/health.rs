//! Health, readiness and discovery reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    /// Serving, but one or more suggestion providers are short-circuited.
    Degraded,
    Unhealthy,
}

/// Circuit state of a single suggestion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderHealth {
    pub name: String,
    /// `CLOSED`, `OPEN` or `HALF_OPEN`.
    pub circuit: String,
    pub failures: u64,
}

/// Reply to the `health` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub policy_roles: usize,
    pub policy_data_types: usize,
    pub patterns: usize,
    pub cache_entries: usize,
    pub cache_hit_rate: f64,
    pub providers: Vec<ProviderHealth>,
}

impl HealthReport {
    /// Ready when a policy is loaded and at least one pattern exists.
    pub fn is_ready(&self) -> bool {
        self.status != HealthStatus::Unhealthy && self.policy_data_types > 0 && self.patterns > 0
    }
}

/// Pattern summary used by the discovery report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    pub id: String,
    pub name: String,
    pub level: crate::types::masking::MaskLevel,
    /// `["all"]` for generic patterns.
    pub data_types: Vec<String>,
}

/// Reply to the `info` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoReport {
    pub name: String,
    pub version: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub roles: Vec<String>,
    pub data_types: Vec<String>,
    pub patterns: Vec<PatternInfo>,
    pub cache_provider: String,
    pub cache_ttl_ms: u64,
    pub cache_max_size: usize,
    pub suggestion_providers: Vec<String>,
}
