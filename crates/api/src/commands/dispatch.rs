//! JSON-lines command dispatch
//!
//! Each input line is `{ "id"?: any, "command": "mask", "body": {...} }` and
//! produces one reply line `{ "id", "requestId", "status", "body" }`. Status
//! codes follow HTTP conventions so a thin HTTP adapter can pass them through.
//! A denied unmask is 403 with the decision (including the level the caller
//! may still display) as the body.

use complimask_domain::{MaskError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};
use uuid::Uuid;

use super::{detect, health, mask};
use crate::context::AppContext;
use crate::utils::logging::error_label;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_SERVER_ERROR: u16 = 500;
pub const STATUS_UNAVAILABLE: u16 = 503;

/// One parsed input line.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub command: String,
    #[serde(default)]
    pub body: Value,
}

/// One reply line; `id` echoes the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReply {
    pub id: Option<Value>,
    pub request_id: String,
    pub status: u16,
    pub body: Value,
}

impl CommandReply {
    fn new(id: Option<Value>, status: u16, body: Value) -> Self {
        Self { id, request_id: Uuid::new_v4().to_string(), status, body }
    }
}

/// Parse one input line and run it. Never fails: malformed lines become 400
/// replies.
pub async fn handle_line(ctx: &AppContext, line: &str) -> CommandReply {
    match serde_json::from_str::<CommandRequest>(line) {
        Ok(request) => dispatch(ctx, request).await,
        Err(err) => {
            warn!(error = %err, "rejected malformed command line");
            let err = MaskError::validation("request", format!("invalid command envelope: {err}"));
            CommandReply::new(None, STATUS_BAD_REQUEST, error_body(&err))
        }
    }
}

/// Run a parsed command and map its outcome to a status and body.
pub async fn dispatch(ctx: &AppContext, request: CommandRequest) -> CommandReply {
    let CommandRequest { id, command, body } = request;

    let outcome = match command.as_str() {
        "mask" => mask::mask(ctx, &body).await.and_then(|response| {
            let status = if response.degraded { STATUS_SERVER_ERROR } else { STATUS_OK };
            to_json(&response).map(|body| (status, body))
        }),
        "unmask" => mask::unmask(ctx, &body).await.and_then(|decision| {
            let status = if decision.allowed { STATUS_OK } else { STATUS_FORBIDDEN };
            to_json(&decision).map(|body| (status, body))
        }),
        "detect" => detect::detect(ctx, &body).and_then(|d| ok_json(&d)),
        "health" => ok_json(&health::health(ctx)),
        "ready" => {
            let ready = health::readiness(ctx);
            let status = if ready { STATUS_OK } else { STATUS_UNAVAILABLE };
            Ok((status, json!({ "ready": ready })))
        }
        "info" => ok_json(&health::info(ctx)),
        "metrics" => health::metrics(ctx).map(|text| (STATUS_OK, Value::String(text))),
        "clear_cache" => {
            mask::clear_cache(ctx).await.map(|()| (STATUS_OK, json!({ "cleared": true })))
        }
        other => Err(MaskError::not_found("command", other)),
    };

    match outcome {
        Ok((status, body)) => CommandReply::new(id, status, body),
        Err(err) => {
            let status = status_for(&err);
            if status >= STATUS_SERVER_ERROR {
                error!(command = %command, error = %err, "command failed");
            }
            CommandReply::new(id, status, error_body(&err))
        }
    }
}

/// Transport status for an error.
pub fn status_for(err: &MaskError) -> u16 {
    match err {
        MaskError::NotFound { .. } => STATUS_NOT_FOUND,
        err if err.is_client_error() => STATUS_BAD_REQUEST,
        _ => STATUS_SERVER_ERROR,
    }
}

fn error_body(err: &MaskError) -> Value {
    json!({ "error": error_label(err), "message": err.to_string() })
}

fn ok_json<T: Serialize>(value: &T) -> Result<(u16, Value)> {
    to_json(value).map(|body| (STATUS_OK, body))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| MaskError::Internal(format!("serialize reply: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates the error to status mapping.
    ///
    /// Assertions:
    /// - Validation errors are 400 and unknown resources 404
    /// - Config, cache and internal errors are 500
    #[test]
    fn test_status_for() {
        assert_eq!(status_for(&MaskError::validation("value", "missing")), STATUS_BAD_REQUEST);
        assert_eq!(status_for(&MaskError::not_found("pattern", "nope")), STATUS_NOT_FOUND);
        assert_eq!(status_for(&MaskError::Config("bad".into())), STATUS_SERVER_ERROR);
        assert_eq!(status_for(&MaskError::Cache("down".into())), STATUS_SERVER_ERROR);
        assert_eq!(status_for(&MaskError::Internal("boom".into())), STATUS_SERVER_ERROR);
    }

    #[test]
    fn test_envelope_defaults() {
        let request: CommandRequest = serde_json::from_str(r#"{"command":"health"}"#).unwrap();
        assert_eq!(request.id, None);
        assert_eq!(request.body, Value::Null);
    }
}
