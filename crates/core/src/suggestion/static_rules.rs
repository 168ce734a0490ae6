//! Local rule table consulted before remote providers

use std::collections::BTreeMap;

use async_trait::async_trait;
use complimask_domain::{MaskLevel, Result};

use super::ports::{Suggestion, SuggestionProvider};

pub const STATIC_RULES_PROVIDER: &str = "static-rules";

/// Suggests a fixed level per data type.
#[derive(Debug, Clone, Default)]
pub struct StaticRuleProvider {
    rules: BTreeMap<String, MaskLevel>,
}

impl StaticRuleProvider {
    /// Provider over a data type to level table.
    pub fn new(rules: BTreeMap<String, MaskLevel>) -> Self {
        Self { rules }
    }

    /// Add or replace the rule for `data_type`.
    pub fn with_rule(mut self, data_type: impl Into<String>, level: MaskLevel) -> Self {
        self.rules.insert(data_type.into(), level);
        self
    }

    /// Whether no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[async_trait]
impl SuggestionProvider for StaticRuleProvider {
    fn name(&self) -> &str {
        STATIC_RULES_PROVIDER
    }

    async fn suggest(
        &self,
        _value: &str,
        data_type: &str,
        _role: &str,
    ) -> Result<Option<Suggestion>> {
        Ok(self.rules.get(data_type).copied().map(Suggestion::Single))
    }
}
