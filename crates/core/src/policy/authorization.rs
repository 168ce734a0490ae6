//! Unmask authorization gate

use complimask_domain::{MaskLevel, RiskLevel, UnmaskDecision, UnmaskRequest};
use tracing::{info, warn};

use super::store::PolicyStore;

const HIGH_RISK_DENIAL: &str = "High risk data requires privileged access";
const POLICY_REVEAL: &str = "Reveal permitted by policy";

/// Decide whether `request.role` may reveal `request.field`.
///
/// High-risk fields requested by anyone but the privileged role are denied
/// with a partial-reveal level instead of a bare refusal. Everything else is
/// allowed at the policy level for the pair (`MaskAll` when unconfigured).
/// This gate never masks values itself.
pub fn authorize_unmask(store: &PolicyStore, request: &UnmaskRequest) -> UnmaskDecision {
    let risk = store.get_risk(&request.field);

    if risk == RiskLevel::High && !store.is_privileged(&request.role) {
        warn!(
            record_id = %request.record_id,
            field = %request.field,
            role = %request.role,
            "unmask denied for high risk field"
        );
        return UnmaskDecision {
            allowed: false,
            level: MaskLevel::PartialLast4,
            reason: HIGH_RISK_DENIAL.to_string(),
        };
    }

    let level = store.base_level(&request.role, &request.field);
    info!(
        record_id = %request.record_id,
        field = %request.field,
        role = %request.role,
        %level,
        purpose = request.purpose.as_deref().unwrap_or("unspecified"),
        "unmask allowed"
    );

    UnmaskDecision { allowed: true, level, reason: POLICY_REVEAL.to_string() }
}
