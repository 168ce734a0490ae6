//! Data-type detection command

use complimask_domain::{MaskError, Result};
use serde::Serialize;
use serde_json::Value;

use crate::context::AppContext;

/// Data types the value matched, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectReply {
    pub data_types: Vec<String>,
}

/// List every known data type a raw value looks like
///
/// Advisory only: mask requests are always evaluated against the declared
/// data type.
pub fn detect(ctx: &AppContext, body: &Value) -> Result<DetectReply> {
    let value = match body.get("value") {
        Some(Value::String(value)) => value,
        _ => return Err(MaskError::validation("value", "must be a string")),
    };
    Ok(DetectReply { data_types: ctx.detector.detect(value) })
}
