//! Health, readiness and discovery commands

use complimask_domain::{HealthReport, InfoReport, MaskError, Result};

use crate::context::AppContext;

/// Get service health
///
/// `DEGRADED` while any suggestion provider circuit is not closed.
///
/// # Example Response
/// ```json
/// {
///   "status": "HEALTHY",
///   "timestamp": "2024-05-01T12:00:00Z",
///   "version": "0.1.0",
///   "policyRoles": 5,
///   "policyDataTypes": 8,
///   "patterns": 11,
///   "cacheEntries": 42,
///   "cacheHitRate": 0.8,
///   "providers": [{ "name": "gemini", "circuit": "CLOSED", "failures": 0 }]
/// }
/// ```
pub fn health(ctx: &AppContext) -> HealthReport {
    ctx.health_check()
}

/// Whether the service can answer mask requests
pub fn readiness(ctx: &AppContext) -> bool {
    ctx.health_check().is_ready()
}

/// Service discovery: roles, data types, patterns and cache settings
pub fn info(ctx: &AppContext) -> InfoReport {
    ctx.service.info()
}

/// Prometheus text exposition of the service counters
///
/// # Errors
/// Returns `MaskError::Internal` if the registry cannot be encoded.
pub fn metrics(ctx: &AppContext) -> Result<String> {
    let stats = ctx.cache_stats();
    ctx.metrics
        .render_prometheus(&ctx.health_check(), stats.as_ref())
        .map_err(|err| MaskError::Internal(format!("metrics export failed: {err}")))
}
