//! Port interfaces for suggestion providers

use async_trait::async_trait;
use complimask_domain::{MaskLevel, Result};

/// A provider's recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Single(MaskLevel),
    /// Several levels, most preferred first. Only the first is used.
    Ranked(Vec<MaskLevel>),
}

impl Suggestion {
    /// The authoritative level: the single level, or the head of a ranking.
    pub fn primary(&self) -> Option<MaskLevel> {
        match self {
            Self::Single(level) => Some(*level),
            Self::Ranked(levels) => levels.first().copied(),
        }
    }
}

impl From<MaskLevel> for Suggestion {
    fn from(level: MaskLevel) -> Self {
        Self::Single(level)
    }
}

/// Source of recommended mask levels (heuristics, models, rule tables)
///
/// Suggestions are advisory: the decision engine clamps them to policy.
/// Errors are swallowed by the chain and count as "no suggestion".
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Stable name used in logs and health reports
    fn name(&self) -> &str;

    /// Recommend a level for `value`, or `None` to defer to the next provider
    async fn suggest(&self, value: &str, data_type: &str, role: &str)
        -> Result<Option<Suggestion>>;
}
