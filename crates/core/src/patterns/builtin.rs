//! Built-in mask patterns

use complimask_domain::constants::data_types;
use complimask_domain::MaskLevel;

use super::registry::{MaskPattern, PatternRegistry};
use super::transforms;

pub mod ids {
    pub const FULL: &str = "FULL";
    pub const NONE: &str = "NONE";
    pub const MASK_ALL: &str = "MASK_ALL";
    pub const PARTIAL_LAST4: &str = "PARTIAL_LAST4";
    pub const PARTIAL_LAST3: &str = "PARTIAL_LAST3";
    pub const CUSTOM_REGEX: &str = "CUSTOM_REGEX";
    pub const CREDIT_CARD_LUHN: &str = "CREDIT_CARD_LUHN";
    pub const ADDRESS_STRUCTURED: &str = "ADDRESS_STRUCTURED";
    pub const NAME_STRUCTURED: &str = "NAME_STRUCTURED";
    pub const DATE_PRESERVE_FORMAT: &str = "DATE_PRESERVE_FORMAT";
    pub const IP_ADDRESS_SUBNET: &str = "IP_ADDRESS_SUBNET";
}

/// One generic pattern per mask level, in level order.
pub fn level_patterns() -> Vec<MaskPattern> {
    vec![
        MaskPattern::new(ids::FULL, MaskLevel::Full, |v, _| transforms::identity(v))
            .with_name("Full Reveal")
            .with_description("Shows the complete value"),
        // Authorization, not the transform, separates NONE from FULL.
        MaskPattern::new(ids::NONE, MaskLevel::None, |v, _| transforms::identity(v))
            .with_name("No Access")
            .with_description("Shows the value unchanged once access is granted"),
        MaskPattern::new(ids::MASK_ALL, MaskLevel::MaskAll, transforms::mask_all_for)
            .with_name("Complete Masking")
            .with_description("Replaces every character, keeping fixed-format separators"),
        MaskPattern::new(ids::PARTIAL_LAST4, MaskLevel::PartialLast4, |v, ctx| {
            transforms::partial_for(v, ctx, 4)
        })
        .with_name("Show Last 4")
        .with_description("Shows only the last 4 characters"),
        MaskPattern::new(ids::PARTIAL_LAST3, MaskLevel::PartialLast3, |v, ctx| {
            transforms::partial_for(v, ctx, 3)
        })
        .with_name("Show Last 3")
        .with_description("Shows only the last 3 characters"),
        MaskPattern::new(ids::CUSTOM_REGEX, MaskLevel::CustomRegex, |v, _| {
            transforms::mask_alphanumeric(v)
        })
        .with_name("Custom")
        .with_description("Masks letters and digits, keeping punctuation"),
    ]
}

/// Format-aware patterns restricted to a single data type.
pub fn data_type_patterns() -> Vec<MaskPattern> {
    vec![
        MaskPattern::new(ids::CREDIT_CARD_LUHN, MaskLevel::PartialLast4, |v, _| {
            transforms::credit_card(v)
        })
        .with_name("Credit Card (Luhn Preserved)")
        .with_description("Keeps the issuer digit and last 4 digits")
        .for_data_types([data_types::CREDIT_CARD]),
        MaskPattern::new(ids::ADDRESS_STRUCTURED, MaskLevel::PartialLast4, |v, _| {
            transforms::address(v)
        })
        .with_name("Structured Address")
        .with_description("Hides the street number, keeps street, city and region")
        .for_data_types([data_types::ADDRESS]),
        MaskPattern::new(ids::NAME_STRUCTURED, MaskLevel::PartialLast3, |v, _| transforms::name(v))
            .with_name("Structured Name")
            .with_description("Hides the first name, keeps later initials")
            .for_data_types([data_types::NAME]),
        MaskPattern::new(ids::DATE_PRESERVE_FORMAT, MaskLevel::PartialLast4, |v, _| {
            transforms::date(v)
        })
        .with_name("Date (Format Preserved)")
        .with_description("Hides day and month, keeps the year")
        .for_data_types([data_types::DATE_OF_BIRTH]),
        MaskPattern::new(ids::IP_ADDRESS_SUBNET, MaskLevel::PartialLast4, |v, _| {
            transforms::ip_address(v)
        })
        .with_name("IP Address (Subnet Preserved)")
        .with_description("Keeps the network prefix, hides the host part")
        .for_data_types([data_types::IP_ADDRESS]),
    ]
}

impl PatternRegistry {
    /// Registry pre-loaded with every built-in pattern.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for pattern in level_patterns().into_iter().chain(data_type_patterns()) {
            registry.register(pattern);
        }
        registry
    }
}
