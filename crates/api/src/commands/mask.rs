//! Masking and unmask authorization commands

use complimask_domain::{MaskResponse, Result, UnmaskDecision};
use serde_json::Value;
use tracing::info;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_with_metrics;

/// Decide how to display a value for a role
///
/// Body: `{ "value": "...", "dataType": "SSN", "role": "Teller" }` with
/// optional `customPattern` / `customLevel`, which can only narrow what the
/// role's policy level reveals.
///
/// # Example Response
/// ```json
/// { "masked": "***-**-6789", "level": "PARTIAL_LAST4", "reason": "...", "source": "Policy" }
/// ```
///
/// A response with `degraded` set carries the fallback decision and should be
/// reported as a server error by the transport.
pub async fn mask(ctx: &AppContext, body: &Value) -> Result<MaskResponse> {
    execute_with_metrics(ctx, "mask", move || async move {
        let response = ctx.service.mask_json(body).await?;
        ctx.metrics.record_decision(&response);
        Ok(response)
    })
    .await
}

/// Authorize revealing a stored field
///
/// Body: `{ "recordId": "...", "field": "SSN", "role": "Teller" }`. Does not
/// mask anything; the caller fetches and displays the field at the returned
/// level.
pub async fn unmask(ctx: &AppContext, body: &Value) -> Result<UnmaskDecision> {
    execute_with_metrics(ctx, "unmask", move || async move {
        let decision = ctx.service.unmask_json(body)?;
        ctx.metrics.record_unmask(decision.allowed);
        info!(allowed = decision.allowed, level = %decision.level, "unmask authorization");
        Ok(decision)
    })
    .await
}

/// Drop every memoized decision
pub async fn clear_cache(ctx: &AppContext) -> Result<()> {
    execute_with_metrics(ctx, "clear_cache", move || async move {
        ctx.service.clear_cache().await?;
        info!("decision cache cleared");
        Ok(())
    })
    .await
}
