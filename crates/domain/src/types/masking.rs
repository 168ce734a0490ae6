//! Mask levels, risk levels and decision results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_MASKED_VALUE, FALLBACK_REASON};
use crate::errors::MaskError;

/// How much of a value may be revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaskLevel {
    /// Reveal the value unchanged.
    Full,
    /// No masking applied. Reveals the value like `Full`.
    None,
    /// Hide every character.
    MaskAll,
    /// Reveal the trailing four characters or digits.
    PartialLast4,
    /// Reveal the trailing three characters or digits.
    PartialLast3,
    /// Caller-supplied transform. Ranked as restrictive as `MaskAll`.
    CustomRegex,
}

impl MaskLevel {
    /// Every mask level, most permissive first.
    pub const ALL: [Self; 6] = [
        Self::Full,
        Self::None,
        Self::PartialLast4,
        Self::PartialLast3,
        Self::MaskAll,
        Self::CustomRegex,
    ];

    /// Permissiveness rank. Higher reveals more.
    pub const fn rank(self) -> u8 {
        match self {
            Self::MaskAll | Self::CustomRegex => 0,
            Self::PartialLast3 => 1,
            Self::PartialLast4 => 2,
            Self::None => 3,
            Self::Full => 4,
        }
    }

    /// Levels that reveal the raw value.
    pub const fn is_revealing(self) -> bool {
        matches!(self, Self::Full | Self::None)
    }

    /// Levels an external suggestion provider may propose.
    pub const fn is_suggestible(self) -> bool {
        !matches!(self, Self::CustomRegex)
    }

    /// Number of trailing characters a partial level reveals.
    pub const fn visible_tail(self) -> Option<usize> {
        match self {
            Self::PartialLast4 => Some(4),
            Self::PartialLast3 => Some(3),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::None => "NONE",
            Self::MaskAll => "MASK_ALL",
            Self::PartialLast4 => "PARTIAL_LAST4",
            Self::PartialLast3 => "PARTIAL_LAST3",
            Self::CustomRegex => "CUSTOM_REGEX",
        }
    }
}

impl fmt::Display for MaskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskLevel {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| MaskError::validation("level", format!("unknown mask level '{s}'")))
    }
}

/// Sensitivity classification of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    High,
    Medium,
    #[default]
    Low,
}

impl RiskLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a decision's level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionSource {
    Policy,
    #[serde(rename = "AI")]
    Ai,
    Custom,
    Fallback,
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Policy => "Policy",
            Self::Ai => "AI",
            Self::Custom => "Custom",
            Self::Fallback => "Fallback",
        };
        f.write_str(label)
    }
}

/// Outcome of a masking decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideResult {
    pub masked: String,
    pub level: MaskLevel,
    pub reason: String,
    pub source: DecisionSource,
}

impl DecideResult {
    /// Decision returned when the engine fails unexpectedly.
    pub fn fallback() -> Self {
        Self {
            masked: FALLBACK_MASKED_VALUE.to_string(),
            level: MaskLevel::MaskAll,
            reason: FALLBACK_REASON.to_string(),
            source: DecisionSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(MaskLevel::MaskAll.rank() < MaskLevel::PartialLast3.rank());
        assert!(MaskLevel::PartialLast3.rank() < MaskLevel::PartialLast4.rank());
        assert!(MaskLevel::PartialLast4.rank() < MaskLevel::None.rank());
        assert!(MaskLevel::None.rank() < MaskLevel::Full.rank());
        assert_eq!(MaskLevel::CustomRegex.rank(), MaskLevel::MaskAll.rank());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&MaskLevel::PartialLast4).unwrap(), "\"PARTIAL_LAST4\"");
        assert_eq!(serde_json::to_string(&MaskLevel::MaskAll).unwrap(), "\"MASK_ALL\"");
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
        assert_eq!(serde_json::to_string(&DecisionSource::Ai).unwrap(), "\"AI\"");

        let level: MaskLevel = serde_json::from_str("\"CUSTOM_REGEX\"").unwrap();
        assert_eq!(level, MaskLevel::CustomRegex);
    }

    #[test]
    fn test_parse_level_is_case_insensitive() {
        assert_eq!(" partial_last3 ".parse::<MaskLevel>().unwrap(), MaskLevel::PartialLast3);
        assert_eq!("FULL".parse::<MaskLevel>().unwrap(), MaskLevel::Full);
        assert!(matches!("REDACT".parse::<MaskLevel>(), Err(MaskError::Validation { .. })));
    }

    #[test]
    fn test_fallback_shape() {
        let fallback = DecideResult::fallback();
        assert_eq!(fallback.masked, "***");
        assert_eq!(fallback.level, MaskLevel::MaskAll);
        assert_eq!(fallback.reason, "fallback due to error");
        assert_eq!(fallback.source, DecisionSource::Fallback);
    }
}
