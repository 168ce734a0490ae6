//! Advisory data-type detection.
//!
//! Guesses which known data types a raw value looks like. The decision
//! engine never consults this; callers always declare the data type.

use complimask_domain::constants::data_types;
use complimask_domain::{MaskError, Result};
use regex::Regex;

/// Extra check run after a pattern matched.
pub type Validator = fn(&str) -> bool;

/// Named detection rule: any pattern must match and every validator pass.
#[derive(Debug, Clone)]
pub struct DataTypeRule {
    pub name: String,
    patterns: Vec<Regex>,
    validators: Vec<Validator>,
}

impl DataTypeRule {
    /// Compile a rule from regex sources.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` if a pattern does not compile.
    pub fn new(name: impl Into<String>, patterns: &[&str]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| MaskError::validation("pattern", e.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name: name.into(), patterns, validators: Vec::new() })
    }

    /// Add a check that must also pass for a match.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Any pattern matches and every validator passes.
    pub fn matches(&self, value: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(value)) && self.validators.iter().all(|v| v(value))
    }
}

/// Ordered set of detection rules.
#[derive(Debug, Clone, Default)]
pub struct DataTypeDetector {
    rules: Vec<DataTypeRule>,
}

impl DataTypeDetector {
    /// Detector with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector with rules for SSN, email, phone, card, IP, date and IBAN.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` if a built-in pattern fails to compile.
    pub fn with_builtins() -> Result<Self> {
        let mut detector = Self::new();
        detector.register(DataTypeRule::new(
            data_types::SSN,
            &[r"^\d{3}-\d{2}-\d{4}$", r"^\d{9}$"],
        )?);
        detector.register(DataTypeRule::new(
            data_types::EMAIL,
            &[r"(?u)^[\p{L}\p{N}._%+-]+@[\p{L}\p{N}.-]+\.[\p{L}]{2,}$"],
        )?);
        detector.register(DataTypeRule::new(
            data_types::PHONE,
            &[r"^\+?1?[\s.-]?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}$"],
        )?);
        detector.register(
            DataTypeRule::new(data_types::CREDIT_CARD, &[r"^(?:\d[ -]?){12,18}\d$"])?
                .with_validator(luhn_check),
        );
        detector.register(
            DataTypeRule::new(data_types::IP_ADDRESS, &[r"^(?:\d{1,3}\.){3}\d{1,3}$"])?
                .with_validator(valid_octets),
        );
        detector.register(DataTypeRule::new(
            data_types::DATE_OF_BIRTH,
            &[r"^\d{2}/\d{2}/\d{4}$", r"^\d{4}-\d{2}-\d{2}$"],
        )?);
        detector.register(DataTypeRule::new(
            data_types::IBAN,
            &[r"^[A-Z]{2}\d{2}(?: ?[A-Z0-9]){11,30}$"],
        )?);
        Ok(detector)
    }

    /// Add a rule, replacing any rule with the same name in place.
    pub fn register(&mut self, rule: DataTypeRule) {
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Names of every rule matching `value`, in registration order.
    pub fn detect(&self, value: &str) -> Vec<String> {
        let value = value.trim();
        self.rules.iter().filter(|r| r.matches(value)).map(|r| r.name.clone()).collect()
    }
}

/// Luhn checksum over the digits of `number`; 13 to 19 digits only.
pub fn luhn_check(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

fn valid_octets(value: &str) -> bool {
    value.split('.').all(|octet| octet.parse::<u8>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates detection of each built-in type.
    ///
    /// Assertions:
    /// - Confirms representative values map to their data type.
    /// - Confirms free text matches nothing.
    #[test]
    fn test_detect_builtin_types() {
        let detector = DataTypeDetector::with_builtins().unwrap();

        assert_eq!(detector.detect("123-45-6789"), vec!["SSN"]);
        assert_eq!(detector.detect("user@example.com"), vec!["EMAIL"]);
        assert_eq!(detector.detect("(555) 123-4567"), vec!["PHONE"]);
        assert_eq!(detector.detect("4111 1111 1111 1111"), vec!["CREDIT_CARD"]);
        assert_eq!(detector.detect("192.168.1.100"), vec!["IP_ADDRESS"]);
        assert_eq!(detector.detect("1985-04-12"), vec!["DATE_OF_BIRTH"]);
        assert_eq!(detector.detect("GB82WEST12345698765432"), vec!["IBAN"]);
        assert!(detector.detect("hello world").is_empty());
    }

    /// Validates validators rejecting pattern matches.
    ///
    /// Assertions:
    /// - Confirms a card failing Luhn and an IP with a 999 octet are ignored.
    #[test]
    fn test_validators_filter_matches() {
        let detector = DataTypeDetector::with_builtins().unwrap();
        assert!(detector.detect("4111111111111112").is_empty());
        assert!(detector.detect("999.168.1.1").is_empty());
    }

    /// Validates the Luhn checksum.
    ///
    /// Assertions:
    /// - Confirms known test card numbers pass and length limits apply.
    #[test]
    fn test_luhn_check() {
        assert!(luhn_check("4111111111111111"));
        assert!(luhn_check("378282246310005"));
        assert!(!luhn_check("4111111111111112"));
        assert!(!luhn_check("42"));
    }

    /// Validates custom rule registration.
    ///
    /// Assertions:
    /// - Confirms a new rule is appended and an invalid regex is rejected.
    #[test]
    fn test_register_custom_rule() {
        let mut detector = DataTypeDetector::new();
        detector.register(DataTypeRule::new("LICENSE_PLATE", &[r"^[A-Z]{3}-\d{4}$"]).unwrap());
        assert_eq!(detector.detect("ABC-1234"), vec!["LICENSE_PLATE"]);
        assert!(matches!(DataTypeRule::new("BROKEN", &["("]), Err(MaskError::Validation { .. })));
    }
}
