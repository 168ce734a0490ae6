//! Request and response types for the mask and unmask operations.
//!
//! Requests arrive as loosely-typed JSON; `from_json` validates field
//! presence and types so transport glue never handles raw `Value`s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{MaskError, Result};
use crate::types::masking::{DecideResult, MaskLevel};

/// Request to mask a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskRequest {
    pub value: String,
    pub data_type: String,
    pub role: String,
    /// Regex whose matches are replaced by `*`, applied over the
    /// policy-masked value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pattern: Option<String>,
    /// Level override, never above the policy level capped by risk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_level: Option<MaskLevel>,
}

impl MaskRequest {
    /// Request with no custom rule.
    pub fn new(
        value: impl Into<String>,
        data_type: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            data_type: data_type.into(),
            role: role.into(),
            custom_pattern: None,
            custom_level: None,
        }
    }

    /// Validate a raw JSON body.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` if `value`, `dataType` or `role` is
    /// missing or not a string, or if `customLevel` is not a known level.
    pub fn from_json(body: &Value) -> Result<Self> {
        let value = required_str(body, "value")?;
        let data_type = required_str(body, "dataType")?;
        let role = required_str(body, "role")?;

        let custom_pattern = optional_str(body, "customPattern")?;
        let custom_level = optional_str(body, "customLevel")?
            .map(|raw| raw.parse::<MaskLevel>())
            .transpose()?;

        Ok(Self { value, data_type, role, custom_pattern, custom_level })
    }

    /// Whether the request carries a custom rule.
    pub fn has_custom_rule(&self) -> bool {
        self.custom_pattern.is_some() || self.custom_level.is_some()
    }
}

/// Result of a mask request as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskResponse {
    #[serde(flatten)]
    pub result: DecideResult,

    /// Present (and `true`) only when served from the decision cache.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cached: bool,

    /// Set when the fallback decision was returned after an internal
    /// failure. Transport glue maps this to a server-error status.
    #[serde(skip)]
    pub degraded: bool,
}

impl MaskResponse {
    /// Decision computed for this request.
    pub fn fresh(result: DecideResult) -> Self {
        Self { result, cached: false, degraded: false }
    }

    /// Decision served from the cache.
    pub fn cached(result: DecideResult) -> Self {
        Self { result, cached: true, degraded: false }
    }

    /// Fully masked fallback after an internal failure.
    pub fn degraded() -> Self {
        Self { result: DecideResult::fallback(), cached: false, degraded: true }
    }
}

/// Request to reveal a stored field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmaskRequest {
    pub record_id: String,
    /// Data type of the field being revealed.
    pub field: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl UnmaskRequest {
    /// Validate a raw JSON body.
    ///
    /// # Errors
    /// Returns `MaskError::Validation` if `recordId`, `field` or `role` is
    /// missing, empty or not a string.
    pub fn from_json(body: &Value) -> Result<Self> {
        let record_id = non_empty(required_str(body, "recordId")?, "recordId")?;
        let field = non_empty(required_str(body, "field")?, "field")?;
        let role = non_empty(required_str(body, "role")?, "role")?;
        let purpose = optional_str(body, "purpose")?;

        Ok(Self { record_id, field, role, purpose })
    }
}

/// Outcome of an unmask authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmaskDecision {
    pub allowed: bool,
    pub level: MaskLevel,
    pub reason: String,
}

fn required_str(body: &Value, field: &str) -> Result<String> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(MaskError::validation(field, "must be a string")),
        None => Err(MaskError::validation(field, "is required")),
    }
}

fn optional_str(body: &Value, field: &str) -> Result<Option<String>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(MaskError::validation(field, "must be a string")),
    }
}

fn non_empty(value: String, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(MaskError::validation(field, "must not be empty"));
    }
    Ok(value)
}
