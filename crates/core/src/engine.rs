//! Masking decision engine

use std::fmt;
use std::sync::Arc;

use complimask_domain::{DecideResult, DecisionSource, MaskError, MaskLevel, Result};
use regex::Regex;
use tracing::debug;

use crate::patterns::{PatternContext, PatternRegistry};
use crate::policy::{cap_by_risk, PolicyStore};

/// Caller-supplied rule, bounded by the role's policy level.
#[derive(Clone)]
pub enum CustomRule {
    /// Replace each match with a single `*`.
    Regex(Regex),
    /// Arbitrary transform.
    Masker(Arc<dyn Fn(&str) -> String + Send + Sync>),
    /// Force a level; never above the policy level capped by risk.
    Level(MaskLevel),
}

impl CustomRule {
    /// Compile a regex rule.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` on an invalid pattern.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| MaskError::validation("customPattern", e.to_string()))
    }

    /// Wrap a closure as a masker rule. It receives the value already masked
    /// at the policy ceiling.
    pub fn masker<F>(masker: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Masker(Arc::new(masker))
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Masker(_) => f.write_str("Masker(..)"),
            Self::Level(level) => f.debug_tuple("Level").field(level).finish(),
        }
    }
}

/// Combines policy, risk capping, an optional suggestion and the pattern
/// registry into a decision.
///
/// Pure and synchronous: safe to call concurrently from any number of
/// tasks.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    policy: Arc<PolicyStore>,
    patterns: Arc<PatternRegistry>,
}

impl DecisionEngine {
    /// Build an engine over a loaded policy and a pattern registry.
    pub fn new(policy: Arc<PolicyStore>, patterns: Arc<PatternRegistry>) -> Self {
        Self { policy, patterns }
    }

    /// Policy the engine reads base levels from.
    pub fn policy(&self) -> &PolicyStore {
        &self.policy
    }

    /// Registry used to render the chosen level.
    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    /// Decide how much of `value` `role` may see.
    ///
    /// Without a suggestion the policy level is capped by risk. A suggestion
    /// is capped by risk and then used only if it is no more permissive than
    /// the policy level. Any suggestion marks the result as `Ai`, whether
    /// it was used or not; the reason records which.
    ///
    /// # Errors
    /// Returns `MaskError::NotFound` if no pattern implements the chosen
    /// level.
    pub fn decide(
        &self,
        value: &str,
        role: &str,
        data_type: &str,
        suggested: Option<MaskLevel>,
    ) -> Result<DecideResult> {
        let base = self.policy.base_level(role, data_type);
        let risk = self.policy.get_risk(data_type);

        let (level, source, reason) = match suggested {
            None => {
                let (level, reason) = self.policy.effective_level(role, data_type);
                (level, DecisionSource::Policy, reason)
            }
            Some(suggestion) => {
                let clamped = cap_by_risk(suggestion, risk);
                if clamped.rank() <= base.rank() {
                    let reason = format!(
                        "AI suggested {suggestion}. Policy level {base}, risk {risk}; chose {clamped}."
                    );
                    (clamped, DecisionSource::Ai, reason)
                } else {
                    let chosen = cap_by_risk(base, risk);
                    let reason = format!(
                        "AI suggested {suggestion}, rejected as more permissive than policy level \
                         {base}. Risk {risk}; chose {chosen}."
                    );
                    (chosen, DecisionSource::Ai, reason)
                }
            }
        };

        let masked = self.mask(level, value, role, data_type)?;
        debug!(role, data_type, %level, %source, "masking decision");
        Ok(DecideResult { masked, level, reason, source })
    }

    /// Apply a caller-supplied rule within the role's authorized exposure.
    ///
    /// The ceiling is the policy level capped by risk. A level override
    /// above the ceiling is lowered to it. Regex and masker rules run over
    /// the value as masked at the ceiling, so they can only hide more.
    ///
    /// # Errors
    /// Returns `MaskError::NotFound` if the chosen level has no pattern.
    pub fn decide_custom(
        &self,
        value: &str,
        role: &str,
        data_type: &str,
        rule: &CustomRule,
    ) -> Result<DecideResult> {
        let base = self.policy.base_level(role, data_type);
        let risk = self.policy.get_risk(data_type);
        let ceiling = cap_by_risk(base, risk);

        let (masked, level, reason) = match rule {
            CustomRule::Masker(masker) => {
                let visible = self.mask(ceiling, value, role, data_type)?;
                (masker(&visible), MaskLevel::CustomRegex, custom_reason("masker", ceiling))
            }
            CustomRule::Regex(re) => {
                let visible = self.mask(ceiling, value, role, data_type)?;
                let masked = re.replace_all(&visible, "*").into_owned();
                (masked, MaskLevel::CustomRegex, custom_reason("regex pattern", ceiling))
            }
            CustomRule::Level(requested) => {
                let (level, reason) = if requested.rank() <= ceiling.rank() {
                    (*requested, "Custom level override.".to_string())
                } else {
                    let reason = format!(
                        "Custom level override {requested} capped to {ceiling}. \
                         Policy level {base}, risk {risk}."
                    );
                    (ceiling, reason)
                };
                (self.mask(level, value, role, data_type)?, level, reason)
            }
        };

        debug!(role, data_type, %level, %ceiling, "custom masking decision");
        Ok(DecideResult { masked, level, reason, source: DecisionSource::Custom })
    }

    fn mask(&self, level: MaskLevel, value: &str, role: &str, data_type: &str) -> Result<String> {
        self.patterns.apply_level(level, value, &PatternContext::new(data_type, role))
    }
}

fn custom_reason(kind: &str, ceiling: MaskLevel) -> String {
    if ceiling.is_revealing() {
        format!("Custom {kind} used.")
    } else {
        format!("Custom {kind} applied over policy level {ceiling}.")
    }
}
