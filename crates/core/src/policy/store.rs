//! Immutable policy store

use std::collections::BTreeSet;

use complimask_domain::{MaskError, MaskLevel, PolicyDocument, Result, RiskLevel};

/// Demote revealing levels to `PartialLast4` for high-risk data.
///
/// Medium and low risk never demote.
pub fn cap_by_risk(level: MaskLevel, risk: RiskLevel) -> MaskLevel {
    if risk == RiskLevel::High && level.is_revealing() {
        MaskLevel::PartialLast4
    } else {
        level
    }
}

/// Read-only view over a loaded [`PolicyDocument`].
///
/// Constructed once at startup and shared by reference; no interior
/// mutability, so concurrent readers need no locking.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    document: PolicyDocument,
}

impl PolicyStore {
    /// Wrap an already-parsed document.
    pub fn new(document: PolicyDocument) -> Self {
        Self { document }
    }

    /// Parse a JSON policy document.
    ///
    /// # Errors
    /// Returns `MaskError::Config` if the document is unparsable or misses
    /// the `policy` or `riskByType` keys.
    pub fn from_json(raw: &str) -> Result<Self> {
        let document: PolicyDocument = serde_json::from_str(raw)
            .map_err(|e| MaskError::Config(format!("invalid policy document: {e}")))?;
        Ok(Self::new(document))
    }

    /// Level configured for `(role, data_type)`, if any.
    pub fn get_level(&self, role: &str, data_type: &str) -> Option<MaskLevel> {
        self.document.policy.get(role).and_then(|levels| levels.get(data_type)).copied()
    }

    /// Configured level, or `MaskAll` when the pair is absent.
    pub fn base_level(&self, role: &str, data_type: &str) -> MaskLevel {
        self.get_level(role, data_type).unwrap_or(MaskLevel::MaskAll)
    }

    /// Risk of `data_type`; unknown types are `Low`.
    pub fn get_risk(&self, data_type: &str) -> RiskLevel {
        self.document.risk_by_type.get(data_type).copied().unwrap_or_default()
    }

    /// Roles in document order.
    pub fn roles(&self) -> &[String] {
        &self.document.roles
    }

    /// Every data type named by either the matrix or the risk table.
    pub fn data_types(&self) -> Vec<String> {
        let mut types: BTreeSet<&str> =
            self.document.risk_by_type.keys().map(String::as_str).collect();
        for levels in self.document.policy.values() {
            types.extend(levels.keys().map(String::as_str));
        }
        types.into_iter().map(ToString::to_string).collect()
    }

    /// Role allowed to unmask high-risk data.
    pub fn privileged_role(&self) -> &str {
        &self.document.privileged_role
    }

    /// Whether `role` is the privileged role.
    pub fn is_privileged(&self, role: &str) -> bool {
        self.document.privileged_role == role
    }

    /// Whether `role` may see medium-risk data in full.
    pub fn is_elevated(&self, role: &str) -> bool {
        self.document.elevated_roles.iter().any(|r| r == role)
    }

    /// Base level capped by risk, with a human-readable reason.
    pub fn effective_level(&self, role: &str, data_type: &str) -> (MaskLevel, String) {
        let base = self.base_level(role, data_type);
        let risk = self.get_risk(data_type);
        let capped = cap_by_risk(base, risk);

        let reason = if capped == base {
            format!("Policy level {base} applied. Risk={risk}.")
        } else {
            format!("Policy level {base} capped to {capped} by risk {risk}.")
        };
        (capped, reason)
    }

    /// Whether `role` may request an unmasked view of `data_type` at all.
    ///
    /// High risk needs the privileged role, medium risk an elevated role.
    pub fn is_unmask_allowed(&self, role: &str, data_type: &str) -> bool {
        match self.get_risk(data_type) {
            RiskLevel::High => self.is_privileged(role),
            RiskLevel::Medium => self.is_elevated(role),
            RiskLevel::Low => true,
        }
    }

    /// Most permissive level an unmask may reveal.
    ///
    /// Full reveal of high-risk data additionally requires a step-up
    /// assertion from the caller.
    pub fn max_reveal_level(&self, role: &str, data_type: &str, step_up: bool) -> MaskLevel {
        match self.get_risk(data_type) {
            RiskLevel::High if self.is_privileged(role) && step_up => MaskLevel::Full,
            RiskLevel::High => MaskLevel::PartialLast4,
            RiskLevel::Medium if self.is_elevated(role) => MaskLevel::Full,
            RiskLevel::Medium => MaskLevel::PartialLast4,
            RiskLevel::Low => MaskLevel::Full,
        }
    }
}
